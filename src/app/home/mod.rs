use super::AppState;
use axum::{routing::get, Router};
use tower_http::services::ServeDir;

pub mod route;

/// The contact form page and the static files it loads.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(route::contact_page))
        .nest_service("/assets", ServeDir::new("assets"))
}
