use crate::domain::model::VoterReport;
use crate::domain::ports::{PollRepository, ReportRepository};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_non_empty_string;

pub struct VoteService<P: PollRepository, R: ReportRepository> {
    polls: P,
    reports: R,
}

impl<P: PollRepository, R: ReportRepository> VoteService<P, R> {
    pub fn new(polls: P, reports: R) -> Self {
        Self { polls, reports }
    }

    /// Record one ballot: one selection per question of the released
    /// snapshot. The tally update is a read-modify-write over the report
    /// items, which is safe under the sequential handler model.
    pub async fn cast_ballot(
        &self,
        poll_id: &str,
        version: u32,
        voter_id: &str,
        selections: &[u32],
    ) -> Result<VoterReport> {
        validate_non_empty_string("poll_id", poll_id)?;
        validate_non_empty_string("voter_id", voter_id)?;

        let release = self
            .polls
            .find_release(poll_id, version)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("release", format!("{}/{}", poll_id, version))
            })?;
        if !release.is_open() {
            return Err(ServiceError::bad_request(
                "version",
                format!("release {} is closed to new ballots", version),
            ));
        }

        if self
            .reports
            .find_voter(poll_id, version, voter_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::bad_request(
                "voter_id",
                format!("voter '{}' has already voted", voter_id),
            ));
        }

        let questions = release.questions();
        if selections.len() != questions.len() {
            return Err(ServiceError::bad_request(
                "selections",
                format!(
                    "expected {} selections, got {}",
                    questions.len(),
                    selections.len()
                ),
            ));
        }
        for (question, selection) in questions.iter().zip(selections) {
            let answer_count = question.answers().len() as u32;
            if *selection >= answer_count {
                return Err(ServiceError::bad_request(
                    "selections",
                    format!(
                        "question {} has {} answers, selection {} is out of range",
                        question.position(),
                        answer_count,
                        selection
                    ),
                ));
            }
        }

        let voter = VoterReport::new(poll_id, version, voter_id, selections.to_vec())?;

        let mut overview = self
            .reports
            .find_overview(poll_id, version)
            .await?
            .ok_or_else(|| {
                ServiceError::store(format!(
                    "overview report missing for release {}/{}",
                    poll_id, version
                ))
            })?;
        let mut answers = self.reports.find_answers(poll_id, version).await?;

        for (question, selection) in questions.iter().zip(selections) {
            let report = answers
                .iter_mut()
                .find(|report| report.position() == question.position())
                .ok_or_else(|| {
                    ServiceError::store(format!(
                        "answer report missing for question {} of release {}/{}",
                        question.position(),
                        poll_id,
                        version
                    ))
                })?;
            report.record_selection(*selection);
        }
        overview.record_voter(voter.voted_at());

        self.reports
            .record_ballot(&voter, &overview, &answers)
            .await?;
        tracing::info!(poll_id, version, voter_id, "ballot recorded");
        Ok(voter)
    }
}
