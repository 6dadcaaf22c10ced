//! The contact form as seen from the submitter's side.
//!
//! [`ContactForm`] holds field values, per-field errors, the character counter
//! and the submit status. [`ContactClient`] posts a validated form to the
//! service. The browser page in `assets/contact.js` follows the same rules.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::contact::{
    email::is_valid_email,
    message::{char_count, MESSAGE_MAX_CHARS},
    phone::is_valid_phone,
};

/// How long the success banner stays up after a submission goes through.
pub const SUCCESS_BANNER_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ServiceType,
    Name,
    Email,
    Phone,
    Company,
    Message,
}

impl Field {
    /// Look a field up by its form input name.
    #[cfg(test)]
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "serviceType" => Some(Self::ServiceType),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "company" => Some(Self::Company),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

/// The values as they are posted to `/api/contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub service_type: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.message.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Name => self.name,
            Field::Email => self.email,
            Field::Phone => self.phone,
            Field::Message => self.message,
            Field::ServiceType | Field::Company => None,
        }
    }

    fn clear(&mut self, field: Field) {
        match field {
            Field::Name => self.name = None,
            Field::Email => self.email = None,
            Field::Phone => self.phone = None,
            Field::Message => self.message = None,
            Field::ServiceType | Field::Company => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Success { shown_at: Instant },
    Error,
}

#[derive(Debug)]
pub struct ContactForm {
    data: FormData,
    errors: FieldErrors,
    status: SubmitStatus,
    submitting: bool,
    char_count: usize,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            data: FormData::default(),
            errors: FieldErrors::default(),
            status: SubmitStatus::Idle,
            submitting: false,
            char_count: 0,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Sending..."
        } else {
            "Send Message"
        }
    }

    /// The counter shown under the message box, e.g. `42/500`.
    pub fn char_counter(&self) -> String {
        format!("{}/{}", self.char_count, MESSAGE_MAX_CHARS)
    }

    /// Apply an edit. A message longer than the limit is refused and the
    /// previous value kept. Returns whether the value was taken.
    ///
    /// Any error shown for the field is cleared either way.
    pub fn change(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        let accepted = match field {
            Field::ServiceType => {
                self.data.service_type = value;
                true
            }
            Field::Name => {
                self.data.name = value;
                true
            }
            Field::Email => {
                self.data.email = value;
                true
            }
            Field::Phone => {
                self.data.phone = value;
                true
            }
            Field::Company => {
                self.data.company = value;
                true
            }
            Field::Message => {
                let count = char_count(&value);
                if count <= MESSAGE_MAX_CHARS {
                    self.data.message = value;
                    self.char_count = count;
                    true
                } else {
                    false
                }
            }
        };

        self.errors.clear(field);
        accepted
    }

    /// Check every required field, replacing the shown errors.
    pub fn validate(&mut self) -> bool {
        let data = &self.data;
        let mut errors = FieldErrors::default();

        if data.name.trim().is_empty() {
            errors.name = Some("Name is required");
        }

        if data.email.trim().is_empty() {
            errors.email = Some("Email is required");
        } else if !is_valid_email(&data.email) {
            errors.email = Some("Invalid email format");
        }

        if data.phone.trim().is_empty() {
            errors.phone = Some("Phone is required");
        } else if !is_valid_phone(&data.phone) {
            errors.phone = Some("Invalid phone format");
        }

        if data.message.trim().is_empty() {
            errors.message = Some("Message is required");
        } else if char_count(&data.message) > MESSAGE_MAX_CHARS {
            errors.message = Some("Message exceeds 500 characters");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// The status as it should be displayed at `now`. A success older than
    /// [`SUCCESS_BANNER_DURATION`] reverts to idle.
    pub fn status_at(&mut self, now: Instant) -> SubmitStatus {
        if let SubmitStatus::Success { shown_at } = self.status {
            if now.saturating_duration_since(shown_at) >= SUCCESS_BANNER_DURATION {
                self.status = SubmitStatus::Idle;
            }
        }
        self.status
    }

    pub fn status(&mut self) -> SubmitStatus {
        self.status_at(Instant::now())
    }

    /// Validate and, if the form is fine and not already in flight, mark it as
    /// submitting and hand back the payload to post.
    pub fn begin_submit(&mut self) -> Option<FormData> {
        if self.submitting || !self.validate() {
            return None;
        }

        self.submitting = true;
        self.status = SubmitStatus::Idle;
        Some(self.data.clone())
    }

    /// Record the outcome of the request started by [`Self::begin_submit`].
    pub fn finish_submit<E: std::fmt::Display>(&mut self, outcome: Result<(), E>, now: Instant) {
        self.submitting = false;
        self.status = match outcome {
            Ok(()) => {
                self.data = FormData::default();
                self.char_count = 0;
                SubmitStatus::Success { shown_at: now }
            }
            Err(e) => {
                tracing::error!(detail = %e, "Form submission error");
                SubmitStatus::Error
            }
        };
    }

    /// Validate, post once, and record the outcome.
    #[tracing::instrument(name = "Submitting the contact form", skip_all)]
    pub async fn submit(&mut self, client: &ContactClient) -> SubmitStatus {
        let Some(payload) = self.begin_submit() else {
            return self.status;
        };

        let outcome = client.post(&payload).await;
        self.finish_submit(outcome, Instant::now());
        self.status
    }
}

/// Posts forms to a running contact service.
#[derive(Clone)]
pub struct ContactClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: format!("{}/api/contact", base_url.trim_end_matches('/')),
        }
    }

    /// Any non-success status counts as a failure; the body is not inspected.
    pub async fn post(&self, data: &FormData) -> Result<(), reqwest::Error> {
        self.http_client
            .post(&self.endpoint)
            .json(data)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
