//! Error types for the value cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for evaluation and the control service.
///
/// The store itself never fails: a missing entry is a miss, not an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The evaluator's compute callback failed for a slot
    #[error("Compute failed for '{slot}': {reason}")]
    ComputeFailure { slot: String, reason: String },

    /// The slot could not be resolved by the evaluator
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Shorthand for a compute failure on `slot`.
    pub fn compute(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        CacheError::ComputeFailure {
            slot: slot.into(),
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::Internal(format!("Evaluation task failed: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::ComputeFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::InvalidSlot(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the value cache.
pub type Result<T> = std::result::Result<T, CacheError>;
