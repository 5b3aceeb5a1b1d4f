//! In-process observability: metrics registry, exposition filter, and the
//! built-in system and HTTP request metrics.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler.

pub mod filter;
pub mod http;
pub mod metrics;
pub mod system;

pub use filter::MetricFilter;
pub use metrics::{MetricKind, MetricLines, MetricsRegistry, Sample};
pub use system::SystemMetrics;
