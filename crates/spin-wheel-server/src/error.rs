//! Error types for the spin wheel server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use prize_draw::DrawError;
use registrant_store::DuplicateRegistrant;
use serde::Serialize;
use thiserror::Error;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Please fill in all fields: {0}")]
    Validation(String),

    #[error("This mobile number has already been used")]
    DuplicateRegistrant(String),

    #[error("You have already used your spin!")]
    DrawAlreadyUsed { index: usize },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,

    /// Locked outcome index, present for `DRAW_ALREADY_USED`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ServerError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Validation(_) => "VALIDATION_FAILED",
            ServerError::DuplicateRegistrant(_) => "DUPLICATE_REGISTRANT",
            ServerError::DrawAlreadyUsed { .. } => "DRAW_ALREADY_USED",
            ServerError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            ServerError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::DuplicateRegistrant(_) => StatusCode::CONFLICT,
            ServerError::DrawAlreadyUsed { .. } => StatusCode::CONFLICT,
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let index = match &self {
            ServerError::DrawAlreadyUsed { index } => Some(*index),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            index,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<DuplicateRegistrant> for ServerError {
    fn from(e: DuplicateRegistrant) -> Self {
        ServerError::DuplicateRegistrant(e.0)
    }
}

impl From<DrawError> for ServerError {
    fn from(e: DrawError) -> Self {
        match e {
            DrawError::AlreadyUsed { index } => ServerError::DrawAlreadyUsed { index },
        }
    }
}
