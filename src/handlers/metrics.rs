use crate::app_state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use std::time::Instant;

/// `route` label shared by every request that no route or static file answered.
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Response marker set by [`not_found`].
#[derive(Debug, Clone, Copy)]
pub struct UnmatchedRoute;

/// Answers requests that matched neither a route nor a static file.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Extension(UnmatchedRoute))
}

/// Handler for the `/metrics` endpoint.
///
/// Returns metrics in Prometheus text format for scraping.
/// Uses the metrics implementation from AppState, which could be
/// either Prometheus or no-op depending on configuration.
pub async fn metrics_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    // ---
    let metrics = app_state.metrics();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, metrics.content_type())],
        metrics.render(),
    )
}

/// Middleware timing every request, labelled by method, path and status.
///
/// Installed as the outermost layer so static files, unknown paths and the
/// scrape endpoint itself are all observed. Unknown paths share the
/// [`UNMATCHED_ROUTE`] label so they cannot grow the series count.
pub async fn track_metrics(State(app_state): State<AppState>, req: Request, next: Next) -> Response {
    // ---
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    let route = match response.extensions().get::<UnmatchedRoute>() {
        Some(_) => UNMATCHED_ROUTE,
        None => path.as_str(),
    };

    app_state
        .metrics()
        .record_http_request(start, route, &method, response.status().as_u16());

    response
}
