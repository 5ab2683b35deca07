mod database;
pub mod metrics;

// Re-export the factory functions for easy access
pub use database::{
    create_memory_store, // ---
    create_mongo_store,
    create_movie_store,
    MemoryMovieStore,
    MongoMovieStore,
};
pub use metrics::{create_metrics, create_noop_metrics, create_prom_metrics};
