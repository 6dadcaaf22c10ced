use askama::Template;
use axum::{extract::State, response::IntoResponse};

use crate::{
    app::AppState,
    domain::contact::{message::MESSAGE_MAX_CHARS, service_type::ServiceType},
};

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactPageTemplate {
    business_name: String,
    business_phone: String,
    business_phone_link: String,
    business_email: String,
    services: Vec<String>,
    max_chars: usize,
}

#[tracing::instrument(name = "Contact page", skip(state))]
pub async fn contact_page(State(state): State<AppState>) -> impl IntoResponse {
    ContactPageTemplate {
        business_name: state.business.name.clone(),
        business_phone: state.business.phone.clone(),
        business_phone_link: state.business.phone_link(),
        business_email: state.business.contact_email.to_string(),
        services: ServiceType::OFFERED
            .iter()
            .map(|s| s.label().to_owned())
            .collect(),
        max_chars: MESSAGE_MAX_CHARS,
    }
}
