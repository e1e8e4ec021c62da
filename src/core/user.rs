use crate::domain::model::User;
use crate::domain::ports::UserRepository;
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_non_empty_string;

pub struct UserService<R: UserRepository> {
    users: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(users: R) -> Self {
        Self { users }
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let user = User::new(name, email)?;
        self.users.save(&user).await?;
        tracing::info!(user_id = user.id(), "user created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        validate_non_empty_string("user_id", user_id)?;
        self.users
            .find(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }
}
