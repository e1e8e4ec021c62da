use crate::api::response::{parse_payload, respond, ApiResponse};
use crate::core::{PollService, QuestionSpec};
use crate::domain::model::{Draft, Question, ReleasedPoll};
use crate::domain::ports::{PollRepository, UserRepository};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct CreateDraftRequest {
    owner_id: String,
    title: String,
    #[serde(default)]
    questions: Vec<QuestionSpec>,
}

#[derive(Debug, Deserialize)]
struct UpdateDraftRequest {
    title: String,
    #[serde(default)]
    questions: Vec<QuestionSpec>,
}

fn questions_body(questions: &[Question]) -> serde_json::Value {
    json!(questions
        .iter()
        .map(|q| json!({
            "position": q.position(),
            "text": q.text(),
            "answers": q.answers(),
        }))
        .collect::<Vec<_>>())
}

fn draft_body(draft: &Draft) -> serde_json::Value {
    json!({
        "poll_id": draft.poll().id(),
        "owner_id": draft.poll().owner_id(),
        "title": draft.poll().title(),
        "created_at": draft.poll().created_at(),
        "questions": questions_body(draft.questions()),
    })
}

fn release_body(release: &ReleasedPoll) -> serde_json::Value {
    json!({
        "poll_id": release.poll_id(),
        "version": release.version(),
        "title": release.title(),
        "released_at": release.released_at(),
        "open": release.is_open(),
        "questions": questions_body(release.questions()),
    })
}

pub struct PollController<P: PollRepository, U: UserRepository> {
    service: PollService<P, U>,
}

impl<P: PollRepository, U: UserRepository> PollController<P, U> {
    pub fn new(service: PollService<P, U>) -> Self {
        Self { service }
    }

    pub async fn create_draft(&self, payload: serde_json::Value) -> ApiResponse {
        let result = async {
            let req: CreateDraftRequest = parse_payload(payload)?;
            let draft = self
                .service
                .create_draft(&req.owner_id, &req.title, &req.questions)
                .await?;
            Ok(draft_body(&draft))
        }
        .await;
        respond(result, 201)
    }

    pub async fn get_draft(&self, poll_id: &str) -> ApiResponse {
        let result = async {
            let draft = self.service.get_draft(poll_id).await?;
            Ok(draft_body(&draft))
        }
        .await;
        respond(result, 200)
    }

    pub async fn update_draft(&self, poll_id: &str, payload: serde_json::Value) -> ApiResponse {
        let result = async {
            let req: UpdateDraftRequest = parse_payload(payload)?;
            let draft = self
                .service
                .update_draft(poll_id, &req.title, &req.questions)
                .await?;
            Ok(draft_body(&draft))
        }
        .await;
        respond(result, 200)
    }

    pub async fn list_drafts(&self, owner_id: &str) -> ApiResponse {
        let result = async {
            let drafts = self.service.list_drafts(owner_id).await?;
            Ok(json!({
                "drafts": drafts
                    .iter()
                    .map(|d| json!({ "poll_id": d.poll_id, "title": d.title }))
                    .collect::<Vec<_>>(),
            }))
        }
        .await;
        respond(result, 200)
    }

    pub async fn release(&self, poll_id: &str) -> ApiResponse {
        let result = async {
            let release = self.service.release(poll_id).await?;
            Ok(release_body(&release))
        }
        .await;
        respond(result, 201)
    }

    pub async fn get_release(&self, poll_id: &str, version: u32) -> ApiResponse {
        let result = async {
            let release = self.service.get_release(poll_id, version).await?;
            Ok(release_body(&release))
        }
        .await;
        respond(result, 200)
    }

    pub async fn close_release(&self, poll_id: &str, version: u32) -> ApiResponse {
        let result = async {
            let release = self.service.close_release(poll_id, version).await?;
            Ok(release_body(&release))
        }
        .await;
        respond(result, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::repository::{PollItems, UserItems};
    use crate::api::user::UserController;
    use crate::core::UserService;

    fn poll_controller(
        store: &InMemoryStore,
    ) -> PollController<PollItems<InMemoryStore>, UserItems<InMemoryStore>> {
        PollController::new(PollService::new(
            PollItems::new(store.clone(), 10, 3),
            UserItems::new(store.clone()),
        ))
    }

    async fn seeded_owner(store: &InMemoryStore) -> String {
        let users = UserController::new(UserService::new(UserItems::new(store.clone())));
        let created = users
            .create(json!({ "name": "Ada", "email": "ada@example.com" }))
            .await;
        created.body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_draft_lifecycle_over_http_shapes() {
        let store = InMemoryStore::new();
        let owner_id = seeded_owner(&store).await;
        let controller = poll_controller(&store);

        let created = controller
            .create_draft(json!({
                "owner_id": owner_id,
                "title": "Lunch",
                "questions": [
                    { "text": "Soup?", "answers": ["yes", "no"] },
                ],
            }))
            .await;
        assert_eq!(created.status, 201);
        let poll_id = created.body["poll_id"].as_str().unwrap().to_string();

        let fetched = controller.get_draft(&poll_id).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["questions"][0]["text"], "Soup?");

        let updated = controller
            .update_draft(
                &poll_id,
                json!({
                    "title": "Lunch v2",
                    "questions": [
                        { "text": "Salad?", "answers": ["yes", "no"] },
                    ],
                }),
            )
            .await;
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["title"], "Lunch v2");

        let listed = controller.list_drafts(&owner_id).await;
        assert_eq!(listed.status, 200);
        assert_eq!(listed.body["drafts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_release_and_close() {
        let store = InMemoryStore::new();
        let owner_id = seeded_owner(&store).await;
        let controller = poll_controller(&store);

        let created = controller
            .create_draft(json!({
                "owner_id": owner_id,
                "title": "Lunch",
                "questions": [{ "text": "Soup?", "answers": ["yes", "no"] }],
            }))
            .await;
        let poll_id = created.body["poll_id"].as_str().unwrap().to_string();

        let released = controller.release(&poll_id).await;
        assert_eq!(released.status, 201);
        assert_eq!(released.body["version"], 1);
        assert_eq!(released.body["open"], true);

        let closed = controller.close_release(&poll_id, 1).await;
        assert_eq!(closed.status, 200);
        assert_eq!(closed.body["open"], false);
    }

    #[tokio::test]
    async fn test_unknown_poll_is_404() {
        let store = InMemoryStore::new();
        let controller = poll_controller(&store);
        assert_eq!(controller.get_draft("missing").await.status, 404);
        assert_eq!(controller.get_release("missing", 1).await.status, 404);
    }

    #[tokio::test]
    async fn test_draft_for_unknown_owner_is_404() {
        let store = InMemoryStore::new();
        let controller = poll_controller(&store);
        let response = controller
            .create_draft(json!({
                "owner_id": "ghost",
                "title": "Lunch",
                "questions": [],
            }))
            .await;
        assert_eq!(response.status, 404);
    }
}
