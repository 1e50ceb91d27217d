//! Tests for health check endpoints.
//!
//! The health registry is process-global, so these tests take a lock and
//! run one at a time; each test refreshes the state it asserts on.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;
use parking_lot::Mutex;

static HEALTH_LOCK: Mutex<()> = Mutex::new(());

/// Test /health returns the full report structure.
#[tokio::test]
async fn test_health_endpoint_structure() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some(), "Response should have 'status'");
    assert!(
        body.get("store_connected").is_some(),
        "Response should have 'store_connected'"
    );
    assert!(
        body.get("sweeper_running").is_some(),
        "Response should have 'sweeper_running'"
    );
    assert!(
        body.get("open_sessions").is_some(),
        "Response should have 'open_sessions'"
    );
}

/// With a healthy store and no background workers the report is degraded.
#[tokio::test]
async fn test_health_reports_store_health() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["store_connected"], true);
    assert_eq!(
        body["sweeper_running"], false,
        "no scheduler runs in this process"
    );
    assert_eq!(body["status"], "degraded");
}

/// A failing store flips the report and readiness; recovery flips them back.
#[tokio::test]
async fn test_store_failure_reflected() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    ctx.set_store_failure(true);
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["store_connected"], false);
    assert_eq!(body["status"], "unhealthy");

    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    ctx.set_store_failure(false);
    let response = server.get("/health").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["store_connected"], true);

    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::OK);
}

/// Readiness follows the last reported store state.
#[tokio::test]
async fn test_ready_endpoint() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Refresh the registry from a healthy store, then probe
    server.get("/health").await.assert_status_ok();
    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::OK);
}

/// Liveness holds whenever the process serves requests.
#[tokio::test]
async fn test_live_endpoint() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/live").await;
    response.assert_status(StatusCode::OK);
}

/// Test open_sessions field is a valid number.
#[tokio::test]
async fn test_health_open_sessions_is_number() {
    let _guard = HEALTH_LOCK.lock();
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let open_sessions = body["open_sessions"].as_u64();
    assert!(
        open_sessions.is_some(),
        "open_sessions should be a valid u64 number"
    );
}
