// src/lib.rs
use anyhow::Result;
use axum::{
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, get_service},
    Router,
};
use std::path::Path;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use handlers::{
    add_movie, // ---
    delete_movie,
    find_movie,
    health_check,
    list_movies,
    metrics_handler,
    not_found,
    track_metrics,
    update_movie,
};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use app_state::AppState;
pub use config::*;
pub use handlers::UNMATCHED_ROUTE;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_store, // ---
    create_metrics,
    create_mongo_store,
    create_movie_store,
    create_noop_metrics,
    create_prom_metrics,
    MemoryMovieStore,
    MongoMovieStore,
};

/// Connects the configured store and metrics backend and builds the router.
///
/// # Errors
/// Fails if the store cannot be reached or the metrics registry cannot be built.
pub async fn create_router(config: &AppConfig) -> Result<Router> {
    // ---
    let store = create_movie_store(&config.database).await?;
    let metrics = create_metrics(config.metrics)?;

    Ok(build_router(
        AppState::new(store, metrics),
        &config.server.public_dir,
    ))
}

/// Builds the HTTP router around an already-initialized [`AppState`].
///
/// Form pages are served from `public_dir`; any other path falls back to a
/// static file lookup in the same directory, then to a bare 404.
pub fn build_router(app_state: AppState, public_dir: &Path) -> Router {
    // ---
    let page = |name: &str| get_service(ServeFile::new(public_dir.join(name)));

    Router::new()
        .route("/", page("index.html"))
        .route("/addmovie", page("addmovie.html").post(add_movie))
        .route("/movies", get(list_movies))
        .route("/deletemovie", page("deletemovie.html").post(delete_movie))
        .route("/updatemovie", page("updatemovie.html").post(update_movie))
        .route("/findmovie", page("findmovie.html").post(find_movie))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .fallback_service(
            ServeDir::new(public_dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(not_found.into_service()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_metrics,
        ))
        .with_state(app_state)
}
