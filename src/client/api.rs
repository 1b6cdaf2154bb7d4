//! Core HTTP client for the homework review API

use std::future::Future;

use chrono::Local;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{
    config::{ClientConfig, DebugConfig},
    error::{ClientError, Result},
};
use crate::{cursor::Cursor, result::WatchError};

/// Anything the poller can pull review statuses from
pub trait HomeworkSource {
    fn fetch(&self, cursor: Cursor) -> impl Future<Output = crate::result::Result<Value>>;
}

/// Pure HTTP client for the review API
#[derive(Debug)]
pub struct ReviewApi {
    client: Client,
    config: ClientConfig,
}

impl ReviewApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client, config })
    }

    /// Get homework statuses changed since `cursor`
    #[instrument(skip(self, cursor), fields(cursor = %cursor))]
    pub async fn get_homework_statuses(&self, cursor: Cursor) -> Result<Value> {
        let response = self
            .authenticated_request()
            .query(&[("from_date", cursor.as_secs())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn authenticated_request(&self) -> RequestBuilder {
        self.client
            .get(self.config.endpoint.as_str())
            .header("Authorization", format!("OAuth {}", self.config.practicum_token))
            .header("User-Agent", concat!("homework-watch/", env!("CARGO_PKG_VERSION")))
    }

    async fn handle_response(&self, response: Response) -> Result<Value> {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        dump_response(&self.config.debug, &url_path, &body);

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Review API returned a non-200 status");
            return Err(ClientError::http_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::decode(url_path, "Response body is not valid JSON", e))
    }
}

impl HomeworkSource for ReviewApi {
    async fn fetch(&self, cursor: Cursor) -> crate::result::Result<Value> {
        self.get_homework_statuses(cursor)
            .await
            .map_err(WatchError::from)
    }
}

/// Write a raw response body under the debug directory, if one is configured
fn dump_response(debug: &DebugConfig, path: &str, body: &str) {
    let Some(dir) = debug.log_directory.as_deref() else {
        return;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Cannot create response dump directory");
        return;
    }

    let endpoint = path.trim_matches('/').replace('/', "_");
    let dump = dir.join(format!("{}_{endpoint}.json", Local::now().format("%Y-%m-%d_%H-%M-%S")));

    match std::fs::write(&dump, body) {
        Ok(()) => debug!(file = %dump.display(), bytes = body.len(), "Response body dumped"),
        Err(e) => warn!(file = %dump.display(), error = %e, "Failed to dump response body"),
    }
}
