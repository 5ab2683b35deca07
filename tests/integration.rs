use anyhow::{ensure, Result};
use movies_api::{build_router, create_memory_store, create_noop_metrics, AppState};

mod common;
use common::TestServer;

#[tokio::test]
async fn basic_integration_test() {
    // ---
    // Test that the router can be built around a fresh state
    let state = AppState::new(create_memory_store(), create_noop_metrics().unwrap());
    let _router = build_router(state, &common::public_dir());
}

#[tokio::test]
async fn health_endpoint_works() {
    // ---
    let server = TestServer::new().await;

    for path in ["/health", "/health?mode=full"] {
        let response = server
            .client
            .get(server.url(path))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 200, "{path}");

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
    }
}

#[tokio::test]
async fn root_serves_landing_page() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/")).send().await?;
    assert_eq!(response.status(), 200);

    let body = response.text().await?;
    ensure!(body.contains("<html"), "expected the landing page, got: {body}");
    Ok(())
}

#[tokio::test]
async fn form_pages_are_served() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    for path in ["/addmovie", "/deletemovie", "/updatemovie", "/findmovie"] {
        let response = server.client.get(server.url(path)).send().await?;
        assert_eq!(response.status(), 200, "{path}");

        let body = response.text().await?;
        let action = format!("action=\"{path}\"");
        ensure!(body.contains(&action), "{path} should post back to itself");
    }
    Ok(())
}

#[tokio::test]
async fn static_files_are_served_by_name() -> Result<()> {
    // ---
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/findmovie.html")).send().await?;
    assert_eq!(response.status(), 200);
    Ok(())
}

#[tokio::test]
async fn invalid_routes_return_404() {
    // ---
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/nonexistent"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn server_handles_concurrent_requests() {
    // ---
    let server = TestServer::new().await;

    // Make multiple concurrent requests
    let futures = (0..10).map(|_| server.client.get(server.url("/health")).send());

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for response in responses {
        let response = response.expect("Request should succeed");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn server_handles_malformed_json() {
    // ---
    let server = TestServer::new().await;

    // Send malformed JSON to the add endpoint
    let response = server
        .client
        .post(server.url("/addmovie"))
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await
        .expect("Failed to send request");

    // Should return 400 Bad Request with an error body
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
