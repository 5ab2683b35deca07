use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::DatabaseConfig;
use crate::domain::{Movie, MovieStore, StoreError, StoreResult};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Connects to MongoDB, waits until the server answers, and ensures the
/// unique `title` index exists.
///
/// # Errors
/// Fails if the URI cannot be parsed, the server stays unreachable for
/// `retry_count` attempts, or the index cannot be built (typically because the
/// collection already holds duplicate titles).
pub async fn create_mongo_store(uri: &str, config: &DatabaseConfig) -> Result<MongoMovieStore> {
    // ---
    let mut options = ClientOptions::parse(uri)
        .await
        .context("invalid MongoDB connection string")?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    // Credentials stay out of the logs; only the hosts are reported.
    tracing::info!(hosts = ?options.hosts, database = %config.name, "Attempting to connect to MongoDB");

    let client = Client::with_options(options).context("failed to build MongoDB client")?;
    let database = client.database(&config.name);

    wait_until_reachable(&database, config).await?;

    let store = MongoMovieStore::new(database.collection(&config.collection), database);
    store.ensure_indexes().await?;

    Ok(store)
}

async fn wait_until_reachable(database: &Database, config: &DatabaseConfig) -> Result<()> {
    // ---
    let attempts = config.retry_count.max(1);

    for attempt in 1..=attempts {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                tracing::info!("Successfully connected to MongoDB");
                return Ok(());
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "MongoDB not reachable yet, retrying");
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to connect to MongoDB");
                return Err(err).context("MongoDB unreachable");
            }
        }
    }

    Ok(())
}

/// Coerces a stored document into the shape [`Movie`] decodes.
///
/// Documents written by other tools may carry numbers that do not parse or
/// non-string list entries. Such numbers are dropped and such entries skipped.
pub(super) fn normalize_stored(mut document: Document) -> Document {
    // ---
    for field in ["year", "runtime"] {
        let usable = match document.get(field) {
            None | Some(Bson::Null) | Some(Bson::Int32(_)) => true,
            Some(Bson::Int64(v)) => i32::try_from(*v).is_ok(),
            Some(Bson::Double(v)) => {
                v.is_finite() && *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX)
            }
            Some(Bson::String(s)) => s.trim().is_empty() || s.trim().parse::<i32>().is_ok(),
            Some(_) => false,
        };
        if !usable {
            document.remove(field);
        }
    }

    for field in ["genres", "cast"] {
        let unusable = match document.get_mut(field) {
            Some(Bson::Array(items)) => {
                items.retain(|item| matches!(item, Bson::String(_)));
                false
            }
            None | Some(Bson::Null) | Some(Bson::String(_)) => false,
            Some(_) => true,
        };
        if unusable {
            document.remove(field);
        }
    }

    document
}

/// Decodes a stored document, or logs and skips it when even the normalized
/// form is not a movie (for example a non-string `title`).
pub(super) fn decode_stored(document: Document) -> Option<Movie> {
    // ---
    let id = document.get("_id").cloned();

    match mongodb::bson::from_document(normalize_stored(document)) {
        Ok(movie) => Some(movie),
        Err(err) => {
            tracing::warn!(id = ?id, error = %err, "Skipping undecodable movie document");
            None
        }
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    // ---
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// `MovieStore` backed by a MongoDB collection.
///
/// Writes go through the typed collection; reads fetch raw documents and
/// decode them leniently, skipping documents that are not movies.
pub struct MongoMovieStore {
    // ---
    collection: Collection<Movie>,
    documents: Collection<Document>,
    database: Database,
}

impl MongoMovieStore {
    // ---
    pub fn new(collection: Collection<Movie>, database: Database) -> Self {
        // ---
        Self {
            documents: collection.clone_with_type(),
            collection,
            database,
        }
    }

    /// Builds the unique index on `title` if it is not there yet.
    pub async fn ensure_indexes(&self) -> Result<()> {
        // ---
        let index = IndexModel::builder()
            .keys(doc! { "title": 1 })
            .options(
                IndexOptions::builder()
                    .name("title_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let namespace = self.collection.namespace();
        self.collection.create_index(index).await.with_context(|| {
            format!(
                "failed to build the unique title index on {namespace}; if it already holds \
                 duplicate titles, point MOVIES_DB_NAME/MOVIES_DB_COLLECTION at another collection"
            )
        })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieStore for MongoMovieStore {
    // ---
    async fn create(&self, movie: Movie) -> StoreResult<Movie> {
        // ---
        let result = self.collection.insert_one(&movie).await;

        match result {
            Ok(_) => Ok(movie),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateTitle(movie.title)),
            Err(err) => Err(anyhow::Error::new(err).context("failed to insert movie").into()),
        }
    }

    async fn find_all(&self) -> StoreResult<Vec<Movie>> {
        // ---
        let cursor = self
            .documents
            .find(doc! {})
            .await
            .context("failed to query movies")?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .context("failed to read movies")?;

        Ok(documents.into_iter().filter_map(decode_stored).collect())
    }

    async fn find_one(&self, title: &str) -> StoreResult<Option<Movie>> {
        // ---
        let document = self
            .documents
            .find_one(doc! { "title": title })
            .await
            .context("failed to look up movie")?;

        Ok(document.and_then(decode_stored))
    }

    async fn update_one(&self, title: &str, movie: Movie) -> StoreResult<bool> {
        // ---
        let result = self
            .collection
            .replace_one(doc! { "title": title }, &movie)
            .await;

        match result {
            Ok(result) => Ok(result.matched_count > 0),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateTitle(movie.title)),
            Err(err) => Err(anyhow::Error::new(err).context("failed to update movie").into()),
        }
    }

    async fn delete_one(&self, title: &str) -> StoreResult<bool> {
        // ---
        let result = self
            .collection
            .delete_one(doc! { "title": title })
            .await
            .context("failed to delete movie")?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        // ---
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        Ok(())
    }
}
