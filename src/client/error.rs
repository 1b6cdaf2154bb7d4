//! Errors raised by the review API client

use compact_str::CompactString;
use thiserror::Error;

use crate::result::{WatchError, clip_chars};

/// Longest slice of an error response body kept for reporting
pub const MAX_ERROR_BODY_CHARS: usize = 200;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout and friends
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: CompactString },

    #[error("Failed to parse JSON from {endpoint}: {message}")]
    Decode {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {field}: {message}")]
    ConfigValidation { field: CompactString, message: CompactString },
}

impl ClientError {
    pub fn http_status(status: u16, body: &str) -> Self {
        Self::HttpStatus { status, body: clip_chars(body.trim(), MAX_ERROR_BODY_CHARS) }
    }

    pub fn decode(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::Decode { endpoint: endpoint.into(), message: message.into(), source }
    }

    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }
}

impl From<&ClientError> for WatchError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Transport(e) => WatchError::Transport(e.to_string().into()),
            ClientError::HttpStatus { status, body } => {
                WatchError::HttpStatus { status: *status, body: body.clone() }
            },
            ClientError::Decode { endpoint, message, source } => WatchError::Decode {
                endpoint: endpoint.clone(),
                message: format!("{message}: {source}").into(),
            },
            ClientError::ConfigValidation { field, message } => {
                WatchError::config(field.clone(), message.clone())
            },
        }
    }
}

impl From<ClientError> for WatchError {
    fn from(err: ClientError) -> Self {
        WatchError::from(&err)
    }
}
