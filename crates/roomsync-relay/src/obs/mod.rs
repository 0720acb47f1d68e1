pub mod metrics;

pub use metrics::RelayMetrics;
