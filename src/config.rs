// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional string variable, falling back to a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub metrics: metrics::MetricsBackend,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env()?,
            database: database::DatabaseConfig::from_env()?,
            metrics: metrics::MetricsBackend::from_env()?,
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;
    use anyhow::Context;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    /// HTTP listener and static content settings.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Address to bind (`HOST`:`PORT`). Defaults to `0.0.0.0:3000`.
        pub addr: SocketAddr,

        /// Directory holding the static HTML pages. Defaults to `public`.
        pub public_dir: PathBuf,
    }

    impl ServerConfig {
        /// Builds a [`ServerConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `HOST` does not form a valid socket address.
        pub fn from_env() -> Result<Self> {
            // ---
            let host = optional_env!("HOST", "0.0.0.0");
            let port = optional_env_parse!("PORT", u16, 3000);
            let public_dir = PathBuf::from(optional_env!("MOVIES_PUBLIC_DIR", "public"));

            Ok(Self {
                addr: format!("{host}:{port}")
                    .parse()
                    .context("Invalid HOST/PORT configuration")?,
                public_dir,
            })
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;
    use std::fmt;

    /// Which record store backs the API.
    #[derive(Clone, PartialEq, Eq)]
    pub enum StoreBackend {
        /// MongoDB, reached through `MONGODB_URI`.
        Mongo { uri: String },

        /// In-process store; contents are lost on restart.
        Memory,
    }

    // The URI usually embeds credentials.
    impl fmt::Debug for StoreBackend {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Mongo { .. } => f.write_str("Mongo { uri: <redacted> }"),
                Self::Memory => f.write_str("Memory"),
            }
        }
    }

    /// Record store configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// Selected backend (`MOVIES_STORE_TYPE`, `mongo` by default).
        pub backend: StoreBackend,

        /// Database name. Defaults to `movies_api`.
        pub name: String,

        /// Collection holding the movie documents. Defaults to `movies`.
        pub collection: String,

        /// Number of ping attempts while waiting for the database at startup. Defaults to 10.
        pub retry_count: u32,

        /// Delay between startup ping attempts. Defaults to 1 second.
        pub retry_delay: Duration,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if the store type is unknown, or if `MONGODB_URI`
        /// is missing while the MongoDB backend is selected.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend = match optional_env!("MOVIES_STORE_TYPE", "mongo").as_str() {
                "mongo" => StoreBackend::Mongo {
                    uri: required_env!("MONGODB_URI"),
                },
                "memory" => StoreBackend::Memory,
                other => anyhow::bail!(
                    "Invalid MOVIES_STORE_TYPE: {other:?} (expected \"mongo\" or \"memory\")"
                ),
            };

            let name = optional_env!("MOVIES_DB_NAME", "movies_api");
            let collection = optional_env!("MOVIES_DB_COLLECTION", "movies");
            let retry_count = optional_env_parse!("MOVIES_DB_RETRY_COUNT", u32, 10);
            let retry_delay_ms = optional_env_parse!("MOVIES_DB_RETRY_DELAY_MS", u64, 1000);

            Ok(Self {
                backend,
                name,
                collection,
                retry_count,
                retry_delay: Duration::from_millis(retry_delay_ms),
            })
        }
    }
}
pub use database::{DatabaseConfig, StoreBackend};

// ============================================================
// Metrics configuration
// ============================================================

mod metrics {
    // ---
    use super::*;

    /// Which metrics implementation records requests.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MetricsBackend {
        Prometheus,
        Noop,
    }

    impl MetricsBackend {
        /// Reads `MOVIES_METRICS_TYPE` (`prom` by default, or `noop`).
        ///
        /// # Errors
        /// Returns an error on any other value.
        pub fn from_env() -> Result<Self> {
            // ---
            match optional_env!("MOVIES_METRICS_TYPE", "prom").as_str() {
                "prom" => Ok(Self::Prometheus),
                "noop" => Ok(Self::Noop),
                other => anyhow::bail!(
                    "Invalid MOVIES_METRICS_TYPE: {other:?} (expected \"prom\" or \"noop\")"
                ),
            }
        }
    }
}
pub use metrics::MetricsBackend;

// ============================================================
// Tests
// ============================================================
