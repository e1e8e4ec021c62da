use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid {field}: {reason}")]
    BadRequest { field: String, reason: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Store operation failed: {message}")]
    Store { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn bad_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        ServiceError::Store {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
