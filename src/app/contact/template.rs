use askama::Template;

use crate::domain::{business::Business, contact::ContactSubmission};

/// Sent to the business for every accepted submission.
#[derive(Template)]
#[template(path = "email/business_notification.html")]
pub struct BusinessNotification<'a> {
    pub submission: &'a ContactSubmission,
    pub client_id: &'a str,
    pub submitted_at: String,
}

impl<'a> BusinessNotification<'a> {
    pub fn new(submission: &'a ContactSubmission, client_id: &'a str) -> Self {
        Self {
            submission,
            client_id,
            submitted_at: chrono::Utc::now()
                .format("%d/%m/%Y, %H:%M:%S UTC")
                .to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!("New Contact Form Submission - {}", self.submission.topic())
    }
}

/// Confirmation sent back to the submitter.
#[derive(Template)]
#[template(path = "email/auto_reply.html")]
pub struct AutoReply<'a> {
    pub submission: &'a ContactSubmission,
    pub business: &'a Business,
}

impl<'a> AutoReply<'a> {
    pub fn subject(&self) -> String {
        format!("Thank you for contacting {}", self.business.name)
    }
}
