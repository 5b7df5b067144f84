//! loterias domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Lottery identifiers and the canonical result record
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `raw`: Total accessors over unvalidated upstream JSON
//! - `normalize`: Raw payload to canonical result mapping
//! - `usecases`: Aggregation, result service, future projections, SEO artifacts

pub mod model;
pub mod normalize;
pub mod ports;
pub mod raw;
pub mod usecases;

pub use model::*;
pub use normalize::normalize;
pub use ports::*;
