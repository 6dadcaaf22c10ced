use super::contact::email::EmailAddress;

/// Who receives the notifications and signs the auto-reply.
#[derive(Debug, Clone)]
pub struct Business {
    pub name: String,
    pub contact_email: EmailAddress,
    pub phone: String,
}

impl Business {
    /// The phone number with everything but digits and `+` removed, for `tel:` links.
    pub fn phone_link(&self) -> String {
        self.phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }
}
