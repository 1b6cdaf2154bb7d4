//! Homework review status watcher
//!
//! Polls the review API with a moving `from_date` cursor, validates the
//! loosely typed response, and forwards the latest status change (or any
//! cycle failure) to a Telegram chat.

pub mod client;
pub mod config;
pub mod cursor;
pub mod domain;
pub mod logging;
pub mod notifier;
pub mod result;

pub use client::{HomeworkPoller, ReviewApi};
pub use config::WatchConfig;
pub use cursor::Cursor;
pub use notifier::{Notify, TelegramNotifier};
pub use result::{Result, WatchError};
