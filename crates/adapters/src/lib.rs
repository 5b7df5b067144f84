//! loterias adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `result_api`: upstream results API client with retry, host failover and caching
//! - `indexing`: search-engine indexing notifiers (IndexNow, webhook)

pub mod indexing;
pub mod result_api;

pub use indexing::{FanoutNotifier, IndexNowNotifier, WebhookNotifier};
pub use result_api::{ResultsApiClient, RetryPolicy, StubResultSource};
