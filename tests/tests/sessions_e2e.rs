//! End-to-end tests for the session lifecycle.
//!
//! These tests drive the full coordination flow over HTTP:
//! POST /sessions → accept → payment → start → completion
//!
//! The router runs over a real in-memory store, so every test exercises
//! the same planning and conditional-write paths as production.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use integration_tests::{fixtures, setup::TestContext};
use session_core::SessionStatus;
use session_store::SessionStore;
use std::sync::Arc;
use worker::{ExpirySweeper, SweepTimeouts};

/// Full lifecycle: open booking → claim → payment → start → completion.
#[tokio::test]
async fn test_open_booking_full_lifecycle() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Student opens a search
    let response = server
        .post("/sessions")
        .json(&fixtures::open_booking("Geometry"))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "searching");
    assert_eq!(body["meetingType"], "on_demand");
    assert_eq!(body["paymentStatus"], "pending");
    assert_eq!(body["version"], 0);
    assert!(body.get("tutorId").is_none(), "no tutor attached yet");
    assert!(body.get("createdAt").is_some());
    let id = body["id"].as_str().expect("session id").to_string();

    // The search is visible to a compatible subject query (shared maths group)
    let response = server
        .get("/sessions/available")
        .add_query_param("subject", "Algebra")
        .await;
    response.assert_status_ok();
    let listed: serde_json::Value = response.json();
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str()),
        "open search should be listed"
    );

    // A tutor claims it
    let response = server
        .put(&format!("/sessions/{}/accept", id))
        .json(&fixtures::tutor_action("tutor-asha"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["tutorId"], "tutor-asha");
    assert_eq!(body["version"], 1);

    // Student pays
    let response = server
        .put(&format!("/sessions/{}/status", id))
        .json(&fixtures::status_change("paid_waiting"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "paid_waiting");
    assert_eq!(body["paymentStatus"], "success");
    assert_eq!(body["version"], 2);

    // First start signal
    let response = server
        .put(&format!("/sessions/{}/status", id))
        .json(&fixtures::status_change("in_progress"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "in_progress");
    assert!(body.get("actualStartTime").is_some());
    assert_eq!(body["version"], 3);

    // Second start signal is idempotent, no write
    let response = server
        .put(&format!("/sessions/{}/status", id))
        .json(&fixtures::status_change("in_progress"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["version"], 3, "repeated start must not bump the version");

    // Completion
    let response = server
        .put(&format!("/sessions/{}/status", id))
        .json(&fixtures::status_change("completed"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
    assert!(body.get("endTime").is_some());
    assert_eq!(body["version"], 4);

    // The finished session reads back and is no longer listed
    let response = server.get(&format!("/sessions/{}", id)).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");

    let response = server.get("/sessions/available").await;
    let listed: serde_json::Value = response.json();
    assert!(
        !listed
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str()),
        "finished session must not be listed"
    );

    // A late accept finds nothing to claim anymore
    let response = server
        .put(&format!("/sessions/{}/accept", id))
        .json(&fixtures::tutor_action("tutor-chen"))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "invalid_transition");
}

/// Direct requests are visible only to the addressed tutor and can be
/// cancelled after the claim.
#[tokio::test]
async fn test_direct_request_lifecycle() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/sessions")
        .json(&fixtures::direct_booking("Physics", "tutor-bela"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending_tutor_approval");
    assert_eq!(body["tutorId"], "tutor-bela");
    let id = body["id"].as_str().unwrap().to_string();

    // Hidden from anonymous listings
    let response = server.get("/sessions/available").await;
    let listed: serde_json::Value = response.json();
    assert!(
        !listed
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str()),
        "direct request must not be listed anonymously"
    );

    // Visible to the addressee
    let response = server
        .get("/sessions/available")
        .add_query_param("tutorId", "tutor-bela")
        .await;
    let listed: serde_json::Value = response.json();
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str()),
        "direct request should be listed for its addressee"
    );

    // The addressee accepts
    let response = server
        .put(&format!("/sessions/{}/accept", id))
        .json(&fixtures::tutor_action("tutor-bela"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["tutorId"], "tutor-bela");

    // Abandoning checkout settles the payment record
    let response = server
        .put(&format!("/sessions/{}/status", id))
        .json(&fixtures::status_change("cancelled"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["paymentStatus"], "failed");
    assert!(body.get("endTime").is_some());
}

/// The addressed tutor can decline a direct request, which cancels it.
#[tokio::test]
async fn test_direct_request_declined_by_addressee() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/sessions")
        .json(&fixtures::direct_booking("Physics", "tutor-bela"))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    let response = server
        .put(&format!("/sessions/{}/decline", id))
        .json(&fixtures::tutor_action("tutor-bela"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "cancelled");
    assert!(body.get("endTime").is_some());
}

/// A scheduled booking without a tutor is an open search with a start time.
#[tokio::test]
async fn test_marketplace_slot_visible_and_claimable() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/sessions")
        .json(&fixtures::marketplace_booking("Calculus"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "searching");
    assert_eq!(body["meetingType"], "scheduled");
    assert!(body.get("scheduledStartTime").is_some());
    let id = body["id"].as_str().unwrap().to_string();

    // Group compatibility applies to slots like any other search
    let response = server
        .get("/sessions/available")
        .add_query_param("subject", "Algebra")
        .await;
    let listed: serde_json::Value = response.json();
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str()),
        "slot should be listed for a maths-group subject"
    );

    let response = server
        .put(&format!("/sessions/{}/accept", id))
        .json(&fixtures::tutor_action("tutor-asha"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending_payment");
    assert_eq!(body["tutorId"], "tutor-asha");
}

/// Declining an open search leaves it claimable by everyone else.
#[tokio::test]
async fn test_declined_open_search_stays_claimable() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/sessions")
        .json(&fixtures::open_booking("Algebra"))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();

    let response = server
        .put(&format!("/sessions/{}/decline", id))
        .json(&fixtures::tutor_action("tutor-asha"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "searching");
    assert_eq!(body["version"], 0, "a declined open search is untouched");

    // Another tutor can still take it
    let response = server
        .put(&format!("/sessions/{}/accept", id))
        .json(&fixtures::tutor_action("tutor-bela"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["tutorId"], "tutor-bela");
}

/// Tutor directory queries rank exact subject matches above group matches.
#[tokio::test]
async fn test_tutor_directory_ranks_exact_above_group() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Asha teaches Algebra: exact
    let response = server
        .get("/tutors/available")
        .add_query_param("subject", "Algebra")
        .await;
    response.assert_status_ok();
    let matches: serde_json::Value = response.json();
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["tutor"]["id"], "tutor-asha");
    assert_eq!(matches[0]["tier"], "exact");

    // Calculus shares the maths group with Asha's subjects
    let response = server
        .get("/tutors/available")
        .add_query_param("subject", "Calculus")
        .await;
    let matches: serde_json::Value = response.json();
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["tutor"]["id"], "tutor-asha");
    assert_eq!(matches[0]["tier"], "group");

    // Nothing in the directory touches this subject
    let response = server
        .get("/tutors/available")
        .add_query_param("subject", "Sanskrit")
        .await;
    let matches: serde_json::Value = response.json();
    assert!(matches.as_array().unwrap().is_empty());
}

/// An expired search is cancelled by the sweeper and reads back cancelled
/// over the API.
#[tokio::test]
async fn test_expired_search_is_swept() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Seed a search that has been sitting for two hours
    let stale = fixtures::session_created_at(
        "Algebra",
        SessionStatus::Searching,
        Utc::now() - Duration::hours(2),
    );
    let id = ctx.store.create_session(stale).await.unwrap().id;

    let sweeper = ExpirySweeper::new(
        ctx.store.clone() as Arc<dyn SessionStore>,
        SweepTimeouts::default(),
    );
    let report = sweeper.run().await.unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.cancelled, 1);
    assert_eq!(report.conflicts, 0);

    let response = server.get(&format!("/sessions/{}", id)).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "cancelled");
    assert!(body.get("endTime").is_some());
}
