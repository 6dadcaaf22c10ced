use axum::{routing::post, Router};

use super::AppState;

pub mod route;
pub mod schema;
pub mod template;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/contact",
        post(route::submit_contact).options(route::preflight),
    )
}
