// Client error types
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, ordered by field name for stable output
pub type FieldErrors = BTreeMap<String, String>;

/// Errors raised while talking to the dashboard backend.
///
/// None of these are fatal: callers turn them into a visible message or a redirect.
#[derive(Debug, Error)]
pub enum ClientError {
    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // Any other non-2xx answer; `message` comes from the server payload when present
    #[error("{message}")]
    Api { status: u16, message: String },

    // Form rejected before any request was sent
    #[error("{message}")]
    Validation { message: String, field_errors: FieldErrors },

    // Connection refused, DNS failure, interrupted body
    #[error("{0}")]
    Network(String),

    // 2xx answer whose body is not the expected shape; carries the fallback message
    #[error("{0}")]
    InvalidResponse(String),

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// HTTP status associated with the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing message
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::InvalidResponse(_) => "INVALID_RESPONSE",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
        });
        if let Some(status) = self.status_code() {
            body["status"] = json!(status);
        }
        if let ClientError::Validation { field_errors, .. } = self {
            body["field_errors"] = json!(field_errors);
        }
        body
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        ClientError::Validation {
            message: "Please correct the highlighted fields".to_string(),
            field_errors,
        }
    }

    /// Field errors when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("transport error: {}", err);
        ClientError::Network(err.to_string())
    }
}

/// Failures of the persistent key/value store backing the session
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage location unavailable: {0}")]
    Location(String),
}
