pub mod noop;
pub mod prometheus;

// Re-export the factory functions for easy access
pub use noop::create as create_noop_metrics;
pub use prometheus::create as create_prom_metrics;

use crate::config::MetricsBackend;
use crate::domain::MetricsPtr;

/// Creates the metrics backend selected by configuration.
pub fn create_metrics(backend: MetricsBackend) -> anyhow::Result<MetricsPtr> {
    // ---
    match backend {
        MetricsBackend::Prometheus => create_prom_metrics(),
        MetricsBackend::Noop => create_noop_metrics(),
    }
}
