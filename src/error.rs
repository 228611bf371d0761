//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache node.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// No ring member with this id
    #[error("Ring node not found: {0}")]
    NodeNotFound(String),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A forwarded request came back to a node already on its path
    #[error("Loop detected: {0}")]
    LoopDetected(String),

    /// The owning node could not be reached or the request could not be built
    #[error("Failed to forward request to {address}: {message}")]
    Forward { address: String, message: String },

    /// The ring has no members
    #[error("No owner available for key: {0}")]
    NoOwner(String),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) | CacheError::NodeNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::LoopDetected(_) => StatusCode::BAD_REQUEST,
            CacheError::Forward { .. } => StatusCode::BAD_GATEWAY,
            CacheError::NoOwner(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidConfig(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
