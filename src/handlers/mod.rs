// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod metrics;
mod movies;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, not_found, track_metrics, UNMATCHED_ROUTE};

// Movie CRUD handlers
pub use movies::{add_movie, delete_movie, find_movie, list_movies, update_movie};
