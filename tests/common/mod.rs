#![allow(dead_code)]

use std::{net::TcpListener, time::Duration};

use homework_watch::{
    ReviewApi, TelegramNotifier,
    client::ClientConfig,
    notifier::TelegramConfig,
};
use wiremock::MockServer;

pub const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";
pub const PRACTICUM_TOKEN: &str = "y0_test_practicum_token";
pub const BOT_TOKEN: &str = "123456:test-bot-token";
pub const CHAT_ID: &str = "424242";

pub fn send_message_path() -> String {
    format!("/bot{BOT_TOKEN}/sendMessage")
}

pub fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}{STATUSES_PATH}", server.uri()), PRACTICUM_TOKEN)
}

pub fn review_api(server: &MockServer) -> ReviewApi {
    ReviewApi::new(client_config(server)).unwrap()
}

pub fn telegram(api_url: impl Into<String>) -> TelegramNotifier {
    let config = TelegramConfig::new(BOT_TOKEN, CHAT_ID).with_api_url(api_url.into());
    TelegramNotifier::new(config, Duration::from_secs(5)).unwrap()
}

/// An address nothing listens on, for connection-refused scenarios
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
