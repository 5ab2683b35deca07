use tokio::sync::RwLock;

use crate::domain::{Movie, MovieStore, StoreError, StoreResult};

/// In-process `MovieStore` keeping records in insertion order.
///
/// Used when `MOVIES_STORE_TYPE=memory` and by the test suites. Contents are
/// lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMovieStore {
    // ---
    movies: RwLock<Vec<Movie>>,
}

impl MemoryMovieStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryMovieStore {
    // ---
    async fn create(&self, movie: Movie) -> StoreResult<Movie> {
        // ---
        let mut movies = self.movies.write().await;

        if movies.iter().any(|m| m.title == movie.title) {
            return Err(StoreError::DuplicateTitle(movie.title));
        }

        movies.push(movie.clone());
        Ok(movie)
    }

    async fn find_all(&self) -> StoreResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_one(&self, title: &str) -> StoreResult<Option<Movie>> {
        // ---
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.title == title).cloned())
    }

    async fn update_one(&self, title: &str, movie: Movie) -> StoreResult<bool> {
        // ---
        let mut movies = self.movies.write().await;

        let Some(index) = movies.iter().position(|m| m.title == title) else {
            return Ok(false);
        };

        let collides = movies
            .iter()
            .enumerate()
            .any(|(i, m)| i != index && m.title == movie.title);
        if collides {
            return Err(StoreError::DuplicateTitle(movie.title));
        }

        movies[index] = movie;
        Ok(true)
    }

    async fn delete_one(&self, title: &str) -> StoreResult<bool> {
        // ---
        let mut movies = self.movies.write().await;

        match movies.iter().position(|m| m.title == title) {
            Some(index) => {
                movies.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
