use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9\s\-\+\(\)]{10,}$").expect("the phone pattern should compile")
});

/// At least ten characters drawn from digits, whitespace, `-`, `+`, `(` and `)`.
///
/// Only the form checks this; the server accepts any non-empty phone.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}
