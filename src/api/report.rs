use crate::api::response::{respond, ApiResponse};
use crate::core::ReportService;
use crate::domain::ports::{PageToken, ReportRepository};
use serde_json::json;

pub struct ReportController<R: ReportRepository> {
    service: ReportService<R>,
}

impl<R: ReportRepository> ReportController<R> {
    pub fn new(service: ReportService<R>) -> Self {
        Self { service }
    }

    pub async fn overview(&self, poll_id: &str, version: u32) -> ApiResponse {
        let result = async {
            let overview = self.service.overview(poll_id, version).await?;
            Ok(json!({
                "poll_id": overview.poll_id(),
                "version": overview.version(),
                "question_count": overview.question_count(),
                "total_voters": overview.total_voters(),
                "last_vote_at": overview.last_vote_at(),
            }))
        }
        .await;
        respond(result, 200)
    }

    pub async fn answers(&self, poll_id: &str, version: u32) -> ApiResponse {
        let result = async {
            let answers = self.service.answers(poll_id, version).await?;
            Ok(json!({
                "poll_id": poll_id,
                "version": version,
                "questions": answers
                    .iter()
                    .map(|a| json!({
                        "position": a.position(),
                        "text": a.text(),
                        "counts": a.counts(),
                    }))
                    .collect::<Vec<_>>(),
            }))
        }
        .await;
        respond(result, 200)
    }

    pub async fn voters(
        &self,
        poll_id: &str,
        version: u32,
        start_after: Option<PageToken>,
    ) -> ApiResponse {
        let result = async {
            let (voters, next) = self.service.voters(poll_id, version, start_after).await?;
            Ok(json!({
                "poll_id": poll_id,
                "version": version,
                "voters": voters
                    .iter()
                    .map(|v| json!({
                        "voter_id": v.voter_id(),
                        "selections": v.selections(),
                        "voted_at": v.voted_at(),
                    }))
                    .collect::<Vec<_>>(),
                "next": next,
            }))
        }
        .await;
        respond(result, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::repository::{PollItems, ReportItems, UserItems};
    use crate::core::{PollService, QuestionSpec, UserService, VoteService};

    async fn released_poll_with_votes(store: &InMemoryStore, voters: usize) -> String {
        let users = UserService::new(UserItems::new(store.clone()));
        let owner = users.create_user("Ada", "ada@example.com").await.unwrap();

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

    fn controller(
        store: &InMemoryStore,
        page_size: usize,
    ) -> ReportController<ReportItems<InMemoryStore>> {
        ReportController::new(ReportService::new(
            ReportItems::new(store.clone(), 10, 3),
            page_size,
        ))
    }

    #[tokio::test]
    async fn test_overview_and_answers_bodies() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 3).await;
        let controller = controller(&store, 10);

        let overview = controller.overview(&poll_id, 1).await;
        assert_eq!(overview.status, 200);
        assert_eq!(overview.body["total_voters"], 3);

        let answers = controller.answers(&poll_id, 1).await;
        assert_eq!(answers.status, 200);
        assert_eq!(answers.body["questions"][0]["counts"], json!([2, 1]));
    }

    #[tokio::test]
    async fn test_voters_page_carries_token() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 3).await;
        let controller = controller(&store, 2);

        let first = controller.voters(&poll_id, 1, None).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body["voters"].as_array().unwrap().len(), 2);
        let token = first.body["next"].as_str().unwrap().to_string();

        let second = controller.voters(&poll_id, 1, Some(token)).await;
        assert_eq!(second.body["voters"].as_array().unwrap().len(), 1);
        assert!(second.body["next"].is_null());
    }

    #[tokio::test]
    async fn test_missing_version_is_404() {
        let store = InMemoryStore::new();
        let poll_id = released_poll_with_votes(&store, 0).await;
        let controller = controller(&store, 10);
        assert_eq!(controller.overview(&poll_id, 9).await.status, 404);
    }
}
