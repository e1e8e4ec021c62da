use crate::domain::model::{AnswerReport, OverviewReport, VoterReport};
use crate::domain::ports::{PageRequest, PageToken, ReportRepository};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_non_empty_string;

pub struct ReportService<R: ReportRepository> {
    reports: R,
    page_size: usize,
}

impl<R: ReportRepository> ReportService<R> {
    pub fn new(reports: R, page_size: usize) -> Self {
        Self { reports, page_size }
    }

    fn release_key(poll_id: &str, version: u32) -> String {
        format!("{}/{}", poll_id, version)
    }

    pub async fn overview(&self, poll_id: &str, version: u32) -> Result<OverviewReport> {
        validate_non_empty_string("poll_id", poll_id)?;
        self.reports
            .find_overview(poll_id, version)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("report", Self::release_key(poll_id, version))
            })
    }

    pub async fn answers(&self, poll_id: &str, version: u32) -> Result<Vec<AnswerReport>> {
        validate_non_empty_string("poll_id", poll_id)?;
        let answers = self.reports.find_answers(poll_id, version).await?;
        // an empty result is either a never-released version or a poll with
        // no questions; the overview item distinguishes them
        if answers.is_empty()
            && self
                .reports
                .find_overview(poll_id, version)
                .await?
                .is_none()
        {
            return Err(ServiceError::not_found(
                "report",
                Self::release_key(poll_id, version),
            ));
        }
        Ok(answers)
    }

    pub async fn voters(
        &self,
        poll_id: &str,
        version: u32,
        start_after: Option<PageToken>,
    ) -> Result<(Vec<VoterReport>, Option<PageToken>)> {
        validate_non_empty_string("poll_id", poll_id)?;
        if self
            .reports
            .find_overview(poll_id, version)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found(
                "report",
                Self::release_key(poll_id, version),
            ));
        }
        self.reports
            .voters(
                poll_id,
                version,
                PageRequest::limited(self.page_size, start_after),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::repository::{PollItems, ReportItems, UserItems};
    use crate::core::poll::{PollService, QuestionSpec};
    use crate::core::vote::VoteService;
    use crate::domain::model::User;
    use crate::domain::ports::UserRepository as _;

    async fn released_poll_with_votes(store: &InMemoryStore, voters: usize) -> String {
        let owner = User::new("Ada", "ada@example.com").unwrap();
        UserItems::new(store.clone()).save(&owner).await.unwrap();

        let polls = PollService::new(
            PollItems::new(store.clone(), 10, 3),
            UserItems::new(store.clone()),
        );
        let draft = polls
            .create_draft(
                owner.id(),
                "Lunch",
                &[QuestionSpec {
                    text: "Soup?".into(),
                    answers: vec!["yes".into(), "no".into()],
                }],
            )
            .await
            .unwrap();
        let poll_id = draft.poll().id().to_string();
        polls.release(&poll_id).await.unwrap();

        let votes = VoteService::new(
            PollItems::new(store.clone(), 10, 3),
            ReportItems::new(store.clone(), 10, 3),
        );
        for i in 0..voters {
            votes
                .cast_ballot(&poll_id, 1, &format!("voter-{}", i), &[(i % 2) as u32])
                .await
                .unwrap();
        }
        poll_id
    }

    fn report_service(store: &InMemoryStore, page_size: usize) -> ReportService<ReportItems<InMemoryStore>> {
        ReportService::new(ReportItems::new(store.clone(), 10, 3), page_size)
    }

    #[tokio::test]
    async fn test_overview_and_answers() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 3).await;
        let service = report_service(&store, 10);

        let overview = service.overview(&poll_id, 1).await.unwrap();
        assert_eq!(overview.total_voters(), 3);
        assert_eq!(overview.question_count(), 1);

        let answers = service.answers(&poll_id, 1).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].counts(), &[2, 1]);
    }

    #[tokio::test]
    async fn test_missing_release_reports_are_not_found() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 0).await;
        let service = report_service(&store, 10);

        assert!(matches!(
            service.overview(&poll_id, 9).await.unwrap_err(),
            ServiceError::NotFound { .. }
        ));
        assert!(matches!(
            service.answers(&poll_id, 9).await.unwrap_err(),
            ServiceError::NotFound { .. }
        ));
        assert!(matches!(
            service.voters(&poll_id, 9, None).await.unwrap_err(),
            ServiceError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_voters_paginate() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 5).await;
        let service = report_service(&store, 2);

        let mut seen = Vec::new();
        let mut token = None;
        loop {
            let (page, next) = service.voters(&poll_id, 1, token).await.unwrap();
            seen.extend(page.into_iter().map(|v| v.voter_id().to_string()));
            match next {
                Some(t) => token = Some(t),
                None => break,
            }
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], "voter-0");
        assert_eq!(seen[4], "voter-4");
    }
}
