//! Panel-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid payload structure: {details}")]
    Validation { details: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PanelError {
    pub fn validation(details: impl Into<String>) -> Self {
        Self::Validation { details: details.into() }
    }
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        match self {
            PanelError::Validation { details } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid payload structure", "details": details })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}

pub type PanelResult<T> = Result<T, PanelError>;
