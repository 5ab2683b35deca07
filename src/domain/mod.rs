mod metrics;
mod movie;
mod movie_store;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the movie model and its store abstraction
pub use movie::{Movie, TitleQuery};
pub use movie_store::{MovieStore, MovieStorePtr, StoreError, StoreResult};
