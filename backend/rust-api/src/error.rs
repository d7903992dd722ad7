use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Phase;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("Failed to load flags: {0}")]
    FetchFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not enough flags: {required} required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: &'static str },
}

impl QuizError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QuizError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            QuizError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            QuizError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            QuizError::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!("Request failed with {}: {}", status, self);
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16()
        });
        (status, Json(body)).into_response()
    }
}
