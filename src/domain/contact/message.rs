use derive_more::Display;

/// Longest accepted message, counted in characters.
pub const MESSAGE_MAX_CHARS: usize = 500;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

#[derive(Debug, Clone, Display)]
#[display(fmt = "{}", _0)]
pub struct Message(String);

impl Message {
    /// The message split on line breaks, for rendering each line separately.
    pub fn lines(&self) -> Vec<&str> {
        self.0.split('\n').map(|line| line.trim_end_matches('\r')).collect()
    }
}

impl TryFrom<String> for Message {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("message is empty".into());
        }

        if char_count(&value) > MESSAGE_MAX_CHARS {
            return Err("message is too long".into());
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
