//! Response types and error handling for the HTTP endpoints
//!
//! Admin endpoints answer with `{"success": bool, "message": string}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Admin endpoint error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// `message` was absent, empty or not a string
    #[error("Message is required.")]
    MissingMessage,

    /// Body could not be read as JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingMessage | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMessage => "MISSING_MESSAGE",
            Self::InvalidBody(_) => "INVALID_BODY",
        }
    }
}

/// Body of every admin publish response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
}

impl StatusBody {
    /// Successful outcome
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::debug!(error = %self, status = %status, "Admin request rejected");

        let body = StatusBody {
            success: false,
            message: self.to_string(),
            code: Some(self.error_code().to_string()),
        };

        (status, Json(body)).into_response()
    }
}
