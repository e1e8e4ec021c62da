use crate::domain::model::{
    AnswerReport, Draft, DraftSummary, OverviewReport, Poll, Question, ReleasedPoll, Version,
};
use crate::domain::ports::{PollRepository, UserRepository};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::{validate_min_len, validate_non_empty_string};
use serde::Deserialize;

/// Incoming question shape, before positions are assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    pub answers: Vec<String>,
}

pub struct PollService<P: PollRepository, U: UserRepository> {
    polls: P,
    users: U,
}

impl<P: PollRepository, U: UserRepository> PollService<P, U> {
    pub fn new(polls: P, users: U) -> Self {
        Self { polls, users }
    }

    fn build_questions(poll_id: &str, specs: &[QuestionSpec]) -> Result<Vec<Question>> {
        specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Question::new(poll_id, i as u32, &spec.text, spec.answers.clone()))
            .collect()
    }

    pub async fn create_draft(
        &self,
        owner_id: &str,
        title: &str,
        questions: &[QuestionSpec],
    ) -> Result<Draft> {
        validate_non_empty_string("owner_id", owner_id)?;
        if self.users.find(owner_id).await?.is_none() {
            return Err(ServiceError::not_found("user", owner_id));
        }

        let poll = Poll::new(owner_id, title)?;
        let questions = Self::build_questions(poll.id(), questions)?;
        let draft = Draft::new(poll, questions);
        self.polls.save_draft(&draft).await?;
        tracing::info!(
            poll_id = draft.poll().id(),
            questions = draft.questions().len(),
            "draft created"
        );
        Ok(draft)
    }

    pub async fn get_draft(&self, poll_id: &str) -> Result<Draft> {
        validate_non_empty_string("poll_id", poll_id)?;
        self.polls
            .find_draft(poll_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("poll", poll_id))
    }

    pub async fn update_draft(
        &self,
        poll_id: &str,
        title: &str,
        questions: &[QuestionSpec],
    ) -> Result<Draft> {
        let mut draft = self.get_draft(poll_id).await?;

        // question slots beyond the new set have no successor item and must
        // be deleted alongside the rewrite
        let new_count = questions.len() as u32;
        let stale: Vec<u32> = draft
            .questions()
            .iter()
            .map(Question::position)
            .filter(|position| *position >= new_count)
            .collect();

        draft.rename(title)?;
        draft.replace_questions(Self::build_questions(poll_id, questions)?);
        self.polls.replace_draft(&draft, &stale).await?;
        tracing::info!(poll_id, questions = questions.len(), "draft updated");
        Ok(draft)
    }

    pub async fn list_drafts(&self, owner_id: &str) -> Result<Vec<DraftSummary>> {
        validate_non_empty_string("owner_id", owner_id)?;
        self.polls.drafts_for_owner(owner_id).await
    }

    pub async fn release(&self, poll_id: &str) -> Result<ReleasedPoll> {
        let draft = self.get_draft(poll_id).await?;
        validate_min_len("questions", draft.questions(), 1)?;

        let version = self.polls.latest_version(poll_id).await? + 1;
        let release = ReleasedPoll::new(&draft, version);
        let marker = Version::new(poll_id, version);
        let overview = OverviewReport::new(poll_id, version, draft.questions().len() as u32);
        let answers: Vec<AnswerReport> = draft
            .questions()
            .iter()
            .map(|question| AnswerReport::new(question, version))
            .collect();

        self.polls
            .save_release(&release, &marker, &overview, &answers)
            .await?;
        tracing::info!(poll_id, version, "poll released");
        Ok(release)
    }

    pub async fn get_release(&self, poll_id: &str, version: u32) -> Result<ReleasedPoll> {
        validate_non_empty_string("poll_id", poll_id)?;
        self.polls
            .find_release(poll_id, version)
            .await?
            .ok_or_else(|| ServiceError::not_found("release", format!("{}/{}", poll_id, version)))
    }

    pub async fn close_release(&self, poll_id: &str, version: u32) -> Result<ReleasedPoll> {
        let mut release = self.get_release(poll_id, version).await?;
        if release.is_open() {
            release.close();
            self.polls.update_release(&release).await?;
            tracing::info!(poll_id, version, "release closed");
        }
        Ok(release)
    }
}
