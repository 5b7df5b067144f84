//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::LotteryId;

/// Error type for result retrieval
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Timed out after {0} ms")]
    Timeout(u64),
    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("All {attempts} attempts failed, last error: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Port for retrieving raw result payloads
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Fetch the raw payload for a contest, or the latest one when `contest` is None.
    ///
    /// The returned value is always a JSON object.
    async fn fetch_raw(&self, lottery: LotteryId, contest: Option<u32>)
    -> Result<Value, FetchError>;
}

/// Error type for indexing notifications
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for telling search engines that pages changed
#[async_trait]
pub trait IndexNotifier: Send + Sync {
    /// Submit canonical page URLs for (re)indexing
    async fn notify(&self, urls: &[String]) -> Result<(), NotifyError>;

    /// Short name used in logs (e.g., "indexnow", "webhook")
    fn name(&self) -> &'static str;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
