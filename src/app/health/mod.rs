use axum::{http::StatusCode, routing::get, Router};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health_check", get(health_check))
}

/// Liveness only; says nothing about the email provider.
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
