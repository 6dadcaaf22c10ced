use serde::{Deserialize, Serialize};

use crate::domain::contact::{
    email::EmailAddress, message::Message, service_type::ServiceType, ContactSubmission,
    SubmissionError,
};

/// The JSON body posted by the contact form. Every field is optional at this
/// level so that absent fields are reported as a validation failure rather
/// than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    pub service_type: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ContactBody> for ContactSubmission {
    type Error = SubmissionError;

    fn try_from(value: ContactBody) -> Result<Self, Self::Error> {
        let (Some(name), Some(email), Some(phone), Some(message)) = (
            present(value.name),
            present(value.email),
            present(value.phone),
            present(value.message),
        ) else {
            return Err(SubmissionError::MissingFields);
        };

        let email = EmailAddress::try_from(email).map_err(|_| SubmissionError::InvalidEmail)?;
        let message = Message::try_from(message).map_err(|_| SubmissionError::MessageTooLong)?;

        Ok(Self {
            service_type: value
                .service_type
                .as_deref()
                .and_then(ServiceType::parse),
            name,
            email,
            phone,
            company: present(value.company),
            message,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: "Form submitted successfully".to_owned(),
        }
    }
}
