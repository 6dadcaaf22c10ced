use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("the email pattern should compile")
});

/// Whether `value` has the basic `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}", _0)]
pub struct EmailAddress(String);

impl TryFrom<String> for EmailAddress {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_email(&value) {
            Ok(Self(value))
        } else {
            Err(format!("{} is not a valid email address", value))
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
