//! Configuration for the review API client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Main configuration for the review API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Homework statuses endpoint
    pub endpoint: CompactString,
    /// OAuth token for the review API
    pub practicum_token: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// Polling interval configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Fixed delay between two cycles, regardless of their outcome
    pub retry_interval: Duration,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Directory for dumping raw response bodies; disabled when `None`
    pub log_directory: Option<PathBuf>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { retry_interval: Duration::from_secs(600) }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<CompactString>, practicum_token: impl Into<CompactString>) -> Self {
        Self {
            endpoint: endpoint.into(),
            practicum_token: practicum_token.into(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ClientError::config_validation(
                "endpoint",
                "Endpoint URL cannot be empty",
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ClientError::config_validation(
                "endpoint",
                "Endpoint URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.endpoint).is_err() {
            return Err(ClientError::config_validation(
                "endpoint",
                "Endpoint URL is not a valid URL format",
            ));
        }

        if self.practicum_token.trim().is_empty() {
            return Err(ClientError::config_validation(
                "practicum_token",
                "Practicum token cannot be empty",
            ));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config_validation(
                "timeout",
                "Timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }
}
