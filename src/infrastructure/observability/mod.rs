//! Push-based observability for pricecast
//!
//! Metrics are kept in a prometheus registry and pushed as periodic
//! structured JSON logs to stdout.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
