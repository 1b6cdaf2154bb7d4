//! Review API client modules
//!
//! The HTTP client, its configuration and errors, and the poller that drives
//! it on a fixed interval.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;

// Re-export main types for convenience
pub use api::{HomeworkSource, ReviewApi};
pub use config::{ClientConfig, PollingConfig};
pub use error::ClientError;
pub use poller::{CycleOutcome, HomeworkPoller};
