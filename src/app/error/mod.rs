use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::contact::SubmissionError;

mod schema;

pub type AppResult<T, E = AppError> = std::result::Result<T, E>;

/// A common error type that can be used throughout the API.
///
/// Can be returned in a `Result` from an API handler function.
///
/// Every variant renders as a JSON `{ "error": ... }` body. Only the class of
/// problem is reported, unexpected errors are logged and hidden behind a
/// generic message.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] SubmissionError),
    #[error("Too many requests. Please try again later.")]
    TooManyRequests,
    #[error("Email service not configured")]
    NotConfigured,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::NotConfigured | Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Axum allows you to return `Result` from handler functions, but the error type
/// also must be some sort of response type.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Validation(ref e) => {
                tracing::info!(reason = %e, "rejected submission");
                e.to_string()
            }
            Self::TooManyRequests => {
                tracing::warn!("rate limit exceeded");
                self.to_string()
            }
            Self::NotConfigured => {
                tracing::error!("email service credential is not configured");
                self.to_string()
            }
            Self::UnexpectedError(ref e) => {
                tracing::error!("{:?}", e);
                "Internal server error".to_owned()
            }
        };

        (self.status_code(), Json(schema::Error { error: message })).into_response()
    }
}
