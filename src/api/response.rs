//! Shared response shape and error mapping. Controllers stay framework
//! agnostic: a status code plus a JSON body is all the HTTP wiring needs.

use crate::utils::error::{Result, ServiceError};
use serde::de::DeserializeOwned;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body }
    }

    pub fn created(body: serde_json::Value) -> Self {
        Self { status: 201, body }
    }
}

impl From<ServiceError> for ApiResponse {
    fn from(err: ServiceError) -> Self {
        let (status, kind) = match &err {
            ServiceError::BadRequest { .. } => (400, "bad_request"),
            ServiceError::NotFound { .. } => (404, "not_found"),
            ServiceError::Store { .. } | ServiceError::Serialization(_) => (500, "internal"),
        };
        if status == 500 {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(error = %err, "request rejected");
        }
        Self {
            status,
            body: json!({ "error": err.to_string(), "kind": kind }),
        }
    }
}

/// Deserialize a request body; malformed payloads are the caller's fault.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|err| ServiceError::bad_request("body", err.to_string()))
}

/// Collapse a handler result into a response.
pub(crate) fn respond(result: Result<serde_json::Value>, status: u16) -> ApiResponse {
    match result {
        Ok(body) => ApiResponse { status, body },
        Err(err) => err.into(),
    }
}
