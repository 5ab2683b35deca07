//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. It is built once at startup and
//! holds the process-lifetime resources: the movie store and the metrics
//! backend.

use crate::domain::{MetricsPtr, MovieStorePtr};

/// Shared application state passed to all Axum handlers.
///
/// Both fields are `Arc`s, so the per-request clone Axum performs is cheap.
/// The state is never mutated after construction; the store driver owns its
/// own connection pool and the metrics backend uses atomic counters.
#[derive(Clone)]
pub struct AppState {
    /// Record store holding the movie documents.
    store: MovieStorePtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,
}

impl AppState {
    // ---

    pub fn new(store: MovieStorePtr, metrics: MetricsPtr) -> Self {
        // ---
        AppState { store, metrics }
    }

    /// Get a reference to the movie store.
    pub(crate) fn store(&self) -> &MovieStorePtr {
        // ---
        &self.store
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }
}
