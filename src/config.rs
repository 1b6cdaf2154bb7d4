use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use crate::{
    client::{
        ClientConfig, PollingConfig,
        config::{DEFAULT_ENDPOINT, DebugConfig, RequestConfig},
    },
    notifier::{DEFAULT_TELEGRAM_API_URL, TelegramConfig},
    result::{Result, WatchError},
};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const REQUIRED: [&str; 3] = [PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID];

/// Everything the watcher needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub client: ClientConfig,
    pub telegram: TelegramConfig,
    pub polling: PollingConfig,
}

impl WatchConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| non_blank(lookup(name));
        check_tokens(&lookup)?;

        let required = |name: &str| -> CompactString { lookup(name).unwrap_or_default().into() };

        let endpoint = lookup("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.into());
        let timeout = parse_secs(&lookup, "REQUEST_TIMEOUT", 30)?;
        let retry_interval = parse_secs(&lookup, "RETRY_TIME", 600)?;

        let client = ClientConfig::new(endpoint, required(PRACTICUM_TOKEN))
            .with_request(RequestConfig { timeout })
            .with_debug(DebugConfig {
                log_directory: lookup("LOG_RESPONSES_DIR").map(PathBuf::from),
            });
        client.validate()?;

        let telegram = TelegramConfig::new(required(TELEGRAM_TOKEN), required(TELEGRAM_CHAT_ID))
            .with_api_url(
                lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.into()),
            );

        Ok(Self { client, telegram, polling: PollingConfig { retry_interval } })
    }
}

/// Fail when any required secret is absent or blank, naming all of them at once
pub fn check_tokens<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&str> = REQUIRED
        .into_iter()
        .filter(|&name| non_blank(lookup(name)).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WatchError::Precondition { names: missing.join(", ").into() })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_secs<F>(lookup: F, name: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(WatchError::config(name, "must be greater than zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(WatchError::config(name, format!("expected whole seconds: {e}"))),
    }
}
