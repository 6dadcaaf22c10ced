use anyhow::Context;
use askama::Template;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::instrument;

use super::schema::{ContactBody, ContactResponse};
use super::template::{AutoReply, BusinessNotification};
use crate::{
    app::{
        error::{AppError, AppResult},
        extractor::ClientIdentity,
        AppState,
    },
    domain::{business::Business, contact::ContactSubmission},
    email::EmailClient,
};

/// Accept a contact form submission and notify both parties.
///
/// The rate limit is applied before anything else, so a request that later
/// fails validation or hits a missing credential still uses up a slot.
#[instrument(
    name = "Submitting the contact form",
    skip(state, client_id, body),
    fields(client_id = %client_id.as_str())
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    client_id: ClientIdentity,
    body: Bytes,
) -> AppResult<Json<ContactResponse>> {
    if !state.rate_limiter.try_acquire(client_id.as_str()).await {
        return Err(AppError::TooManyRequests);
    }

    // Parsed by hand so a missing or odd Content-Type is not a rejection.
    let body: ContactBody =
        serde_json::from_slice(&body).context("Failed to parse the submission body")?;
    let submission = ContactSubmission::try_from(body)?;

    let Some(email_client) = state.email_client.as_ref() else {
        return Err(AppError::NotConfigured);
    };

    let notification = BusinessNotification::new(&submission, client_id.as_str());
    let notification_html = notification
        .render()
        .context("Failed to render the business notification")?;
    let auto_reply = AutoReply {
        submission: &submission,
        business: &state.business,
    };
    let auto_reply_html = auto_reply
        .render()
        .context("Failed to render the auto-reply")?;

    let report = DeliveryReport {
        business_notification: send_business_notification(
            email_client,
            &state.business,
            &notification.subject(),
            &notification_html,
        )
        .await,
        auto_reply: send_auto_reply(
            email_client,
            &submission,
            &auto_reply.subject(),
            &auto_reply_html,
        )
        .await,
    };
    report.log();

    tracing::info!(
        service_type = submission.service_type.as_ref().map(|s| s.label()),
        name = %submission.name,
        email = %submission.email,
        phone = %submission.phone,
        company = submission.company.as_deref(),
        delivered = report.delivered(),
        "Form submission received"
    );

    Ok(Json(ContactResponse::accepted()))
}

pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Outcome of the two notification emails. Never affects the response.
pub struct DeliveryReport {
    pub business_notification: anyhow::Result<()>,
    pub auto_reply: anyhow::Result<()>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> bool {
        self.business_notification.is_ok() && self.auto_reply.is_ok()
    }

    fn log(&self) {
        if let Err(e) = &self.business_notification {
            tracing::error!(detail = ?e, "Failed to deliver the business notification");
        }
        if let Err(e) = &self.auto_reply {
            tracing::error!(detail = ?e, "Failed to deliver the auto-reply");
        }
    }
}

#[instrument(name = "Send the business notification", skip_all)]
async fn send_business_notification(
    email_client: &EmailClient,
    business: &Business,
    subject: &str,
    html: &str,
) -> anyhow::Result<()> {
    email_client
        .send_email(&business.contact_email, subject, html)
        .await
        .with_context(|| format!("Failed to send a notification to {}", business.contact_email))
}

#[instrument(name = "Send the auto-reply", skip_all, fields(recipient = %submission.email))]
async fn send_auto_reply(
    email_client: &EmailClient,
    submission: &ContactSubmission,
    subject: &str,
    html: &str,
) -> anyhow::Result<()> {
    email_client
        .send_email(&submission.email, subject, html)
        .await
        .with_context(|| format!("Failed to send an auto-reply to {}", submission.email))
}
