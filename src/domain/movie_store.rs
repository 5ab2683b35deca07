use super::movie::Movie;
use std::sync::Arc;

/// Failures surfaced by a [`MovieStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // ---
    /// A record with this title already exists; titles are the only key
    /// clients can address records by, so they must be unique.
    #[error("a movie titled {0:?} already exists")]
    DuplicateTitle(String),

    /// Connectivity or driver failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Abstraction for movie record persistence.
///
/// Records are addressed by title. Implementations keep titles unique, so the
/// title-keyed operations touch at most one record.
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    // ---
    /// Store a new record and return it.
    async fn create(&self, movie: Movie) -> StoreResult<Movie>;

    /// Every record, unpaginated. Ordering is unspecified.
    async fn find_all(&self) -> StoreResult<Vec<Movie>>;

    /// The record with this title, if any.
    async fn find_one(&self, title: &str) -> StoreResult<Option<Movie>>;

    /// Replace the whole record with this title. Returns `false` if nothing matched.
    async fn update_one(&self, title: &str, movie: Movie) -> StoreResult<bool>;

    /// Remove the record with this title. Returns `false` if nothing matched.
    async fn delete_one(&self, title: &str) -> StoreResult<bool>;

    /// Round-trip to the backend, for health checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// Type alias for any backend that implements MovieStore.
pub type MovieStorePtr = Arc<dyn MovieStore>;
