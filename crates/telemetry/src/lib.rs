//! Observability for the capitals quiz service.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::Metrics;
