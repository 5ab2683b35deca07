// Test helpers are intentionally partially used
#![allow(dead_code)]

use movies_api::{build_router, create_memory_store, create_prom_metrics, AppState};
use reqwest::{redirect, Client};
use std::path::PathBuf;
use std::sync::Once;
use tokio::net::TcpListener;

static TRACING_INIT: Once = Once::new();

// ============================================================================
// Test Setup
// ============================================================================

/// Initialize tracing once for all tests; enable with `TEST_DEBUG=1`.
pub fn init_tracing() {
    // ---
    TRACING_INIT.call_once(|| {
        if std::env::var("TEST_DEBUG").is_ok() {
            tracing_subscriber::fmt()
                .with_ansi(false) // No colorization, makes logs easier to read.
                .with_env_filter("debug")
                .with_test_writer()
                .init();
        }
    });
}

pub fn public_dir() -> PathBuf {
    // ---
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

/// A live server on an ephemeral port, backed by the in-memory store and its
/// own Prometheus registry.
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // ---
        Self::with_state(AppState::new(
            create_memory_store(),
            create_prom_metrics().expect("metrics"),
        ))
        .await
    }

    pub async fn with_state(state: AppState) -> Self {
        // ---
        init_tracing();

        let app = build_router(state, &public_dir());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are asserted on, not followed.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}
