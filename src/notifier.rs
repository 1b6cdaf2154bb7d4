//! Telegram delivery of status and failure messages

use std::{future::Future, time::Duration};

use compact_str::CompactString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::result::{Result, WatchError, clip_chars};

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot API limit on the text of one message, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Fire-and-forget message delivery; implementations must never fail outward
pub trait Notify {
    fn notify(&self, message: &str) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL, without the `/bot<token>` suffix
    pub api_url: CompactString,
    pub bot_token: CompactString,
    pub chat_id: CompactString,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<CompactString>, chat_id: impl Into<CompactString>) -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API_URL.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<CompactString>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API envelope; only the parts we check
#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    description: Option<CompactString>,
}

#[derive(Debug)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WatchError::delivery)?;

        Ok(Self { client, config })
    }

    /// Send `text` to the configured chat, surfacing any failure
    ///
    /// Text over the Bot API limit is clipped rather than rejected upstream.
    #[instrument(skip(self, text), fields(chat_id = %self.config.chat_id))]
    pub async fn deliver(&self, text: &str) -> Result<()> {
        let text = clip_chars(text, MAX_MESSAGE_CHARS);
        let request = SendMessageRequest { chat_id: &self.config.chat_id, text: &text };

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| WatchError::delivery(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WatchError::delivery(e.without_url()))?;
        let reply = serde_json::from_str::<TelegramReply>(&body).ok();

        match reply {
            Some(TelegramReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramReply { description: Some(description), .. }) => Err(
                WatchError::delivery(format_args!("HTTP {}: {}", status.as_u16(), description)),
            ),
            _ => Err(WatchError::delivery(format_args!("HTTP {}: {}", status.as_u16(), body))),
        }
    }
}

impl Notify for TelegramNotifier {
    async fn notify(&self, message: &str) {
        match self.deliver(message).await {
            Ok(()) => info!("Message delivered to Telegram"),
            Err(e) => error!(error = %e, "Failed to deliver message to Telegram"),
        }
    }
}
