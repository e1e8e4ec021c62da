use crate::api::response::{parse_payload, respond, ApiResponse};
use crate::core::UserService;
use crate::domain::model::User;
use crate::domain::ports::UserRepository;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    name: String,
    email: String,
}

fn user_body(user: &User) -> serde_json::Value {
    json!({
        "id": user.id(),
        "name": user.name(),
        "email": user.email(),
        "created_at": user.created_at(),
    })
}

pub struct UserController<R: UserRepository> {
    service: UserService<R>,
}

impl<R: UserRepository> UserController<R> {
    pub fn new(service: UserService<R>) -> Self {
        Self { service }
    }

    pub async fn create(&self, payload: serde_json::Value) -> ApiResponse {
        let result = async {
            let req: CreateUserRequest = parse_payload(payload)?;
            let user = self.service.create_user(&req.name, &req.email).await?;
            Ok(user_body(&user))
        }
        .await;
        respond(result, 201)
    }

    pub async fn get(&self, user_id: &str) -> ApiResponse {
        let result = async {
            let user = self.service.get_user(user_id).await?;
            Ok(user_body(&user))
        }
        .await;
        respond(result, 200)
    }
}
