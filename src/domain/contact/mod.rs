pub mod email;
pub mod message;
pub mod phone;
pub mod service_type;

use self::email::EmailAddress;
use self::message::Message;
use self::service_type::ServiceType;

/// A validated contact form submission. Lives for one request only.
pub struct ContactSubmission {
    pub service_type: Option<ServiceType>,
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub company: Option<String>,
    pub message: Message,
}

impl ContactSubmission {
    /// Subject suffix used for the business notification.
    pub fn topic(&self) -> &str {
        self.service_type
            .as_ref()
            .map(ServiceType::label)
            .unwrap_or("General Inquiry")
    }
}

/// Why a submission was turned away. The client only sees the class of
/// problem, never which field caused it.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Message too long")]
    MessageTooLong,
}
