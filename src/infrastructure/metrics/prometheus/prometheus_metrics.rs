//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait on top of the `prometheus`
//! crate. Every instance owns its own `Registry` holding:
//!
//! - the process collector (CPU, memory, open fds, start time) on Linux,
//! - `http_request_duration_microseconds{method,route,code}`,
//! - `movies_created_total`.

use crate::domain::Metrics;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, Registry, TextEncoder};
use std::time::Instant;

const HTTP_DURATION_NAME: &str = "http_request_duration_microseconds";
const HTTP_DURATION_HELP: &str = "Duration of HTTP requests in microseconds";
const HTTP_DURATION_BUCKETS: [f64; 11] = [
    0.1, 5.0, 15.0, 50.0, 100.0, 300.0, 500.0, 1000.0, 3000.0, 5000.0, 10000.0,
];

/// Prometheus-based metrics implementation.
pub struct PrometheusMetrics {
    registry: Registry,
    http_duration: HistogramVec,
    movies_created: IntCounter,
}

impl PrometheusMetrics {
    /// Build a registry with the process collector and the service metrics.
    ///
    /// # Errors
    /// Returns an error if metric registration fails (e.g. duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        // ---
        tracing::info!("Creating Prometheus metrics");
        let registry = Registry::new();

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let http_duration = HistogramVec::new(
            HistogramOpts::new(HTTP_DURATION_NAME, HTTP_DURATION_HELP)
                .buckets(HTTP_DURATION_BUCKETS.to_vec()),
            &["method", "route", "code"],
        )?;

        let movies_created = IntCounter::new(
            "movies_created_total",
            "Total number of movies created through the API",
        )?;

        registry.register(Box::new(http_duration.clone()))?;
        registry.register(Box::new(movies_created.clone()))?;

        Ok(Self {
            registry,
            http_duration,
            movies_created,
        })
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        // ---
        let families = self.registry.gather();
        let mut buffer = Vec::new();

        if let Err(err) = TextEncoder::new().encode(&families, &mut buffer) {
            tracing::error!(error = %err, "Prometheus text encoder failed");
            return String::new();
        }

        let mut text = String::from_utf8_lossy(&buffer).into_owned();

        // Vec families without children are dropped by gather(); keep the
        // request histogram advertised before its first observation.
        if !text.contains(HTTP_DURATION_NAME) {
            text.push_str(&format!(
                "# HELP {HTTP_DURATION_NAME} {HTTP_DURATION_HELP}\n# TYPE {HTTP_DURATION_NAME} histogram\n"
            ));
        }

        text
    }

    fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    fn record_movie_created(&self) {
        tracing::debug!("Recording movie created event");
        self.movies_created.inc();
    }

    fn record_http_request(&self, start: Instant, route: &str, method: &str, status: u16) {
        // ---
        let micros = start.elapsed().as_secs_f64() * 1_000_000.0;
        let code = status.to_string();

        self.http_duration
            .with_label_values(&[method, route, code.as_str()])
            .observe(micros);
    }
}
