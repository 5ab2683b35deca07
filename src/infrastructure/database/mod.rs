mod memory_store;
mod mongo_store;


pub use memory_store::MemoryMovieStore;
pub use mongo_store::{create_mongo_store, MongoMovieStore};

use crate::config::{DatabaseConfig, StoreBackend};
use crate::domain::MovieStorePtr;
use anyhow::Result;
use std::sync::Arc;

/// Creates an empty in-process movie store.
pub fn create_memory_store() -> MovieStorePtr {
    // ---
    Arc::new(MemoryMovieStore::new())
}

/// Creates the movie store selected by configuration.
pub async fn create_movie_store(config: &DatabaseConfig) -> Result<MovieStorePtr> {
    // ---
    match &config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory movie store; records are lost on restart");
            Ok(create_memory_store())
        }
        StoreBackend::Mongo { uri } => Ok(Arc::new(create_mongo_store(uri, config).await?)),
    }
}
