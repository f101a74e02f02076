//! Observability: per-packet outcome counters.

pub mod metrics;

pub use metrics::RelayMetrics;
