//! Application use cases / business logic

pub mod aggregate;
pub mod future;
pub mod results;
pub mod seo;

pub use aggregate::{AggregateReport, fetch_all};
pub use future::{project, project_range};
pub use results::ResultService;
