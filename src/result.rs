use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis
pub fn clip_chars(text: &str, max_chars: usize) -> CompactString {
    match text.char_indices().nth(max_chars) {
        None => text.into(),
        Some(_) => {
            let keep = max_chars.saturating_sub(1);
            let end = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
            let mut clipped = CompactString::from(&text[..end]);
            clipped.push('…');
            clipped
        },
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatchError {
    #[error("Required environment variables are missing: {names}")]
    Precondition { names: CompactString },

    #[error("Invalid configuration: {field}: {message}")]
    Config { field: CompactString, message: CompactString },

    #[error("Review API is unreachable: {0}")]
    Transport(CompactString),

    #[error("Review API returned HTTP {status} instead of 200: {body}")]
    HttpStatus { status: u16, body: CompactString },

    #[error("Failed to decode JSON from {endpoint}: {message}")]
    Decode { endpoint: CompactString, message: CompactString },

    #[error("Key '{0}' not found in the API response")]
    MissingKey(CompactString),

    #[error("Value under key '{key}' is not a list (found {found})")]
    Shape { key: CompactString, found: CompactString },

    #[error("Homework record has no '{0}' field")]
    MissingField(CompactString),

    #[error("Undocumented homework status: {0}")]
    UnknownStatus(CompactString),

    #[error("Failed to deliver message to Telegram: {0}")]
    Delivery(CompactString),
}

impl WatchError {
    /// Create a configuration validation error
    pub fn config(field: impl Into<CompactString>, message: impl Into<CompactString>) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    pub fn missing_key(key: impl Into<CompactString>) -> Self {
        Self::MissingKey(key.into())
    }

    pub fn missing_field(field: impl Into<CompactString>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn delivery(message: impl std::fmt::Display) -> Self {
        Self::Delivery(message.to_string().into())
    }

    /// Transport failures abort the fetch outright; everything else is a protocol or data fault
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
