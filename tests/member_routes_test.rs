// ABOUTME: Integration tests for member, support, document preview and discovery routes
// ABOUTME: Also covers the fallback 404, request IDs and verbose versus redacted errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::{http::StatusCode, routing::get, Router};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve a fixed internal page on loopback and return its URL
async fn spawn_internal_page() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/internal/metadata",
        get(|| async { "instance-id: i-0123456789; role: insurance-prod" }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/internal/metadata")
}

// ============================================================================
// Member routes
// ============================================================================

#[tokio::test]
async fn test_notifications_require_valid_token() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/user/notifications")
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "AUTH_REQUIRED");

    let body: Value = AxumTestRequest::get("/api/user/notifications")
        .bearer(&server.expired_token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "TOKEN_EXPIRED");

    let body: Value = AxumTestRequest::get("/api/user/notifications")
        .bearer(&server.token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["type"], "policy");
    assert_eq!(items[3]["read"], true);
}

#[tokio::test]
async fn test_claim_estimate() {
    let server = common::create_test_server().await;
    let token = server.token_for("mike.davis", "user");

    let body: Value = AxumTestRequest::post("/api/claims/estimate")
        .bearer(&token)
        .json(&json!({
            "policyId": "INS-123456",
            "incidentType": "vehicle",
            "estimatedDamage": "2500.50"
        }))
        .send(server.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert!(body["claimId"].as_str().unwrap().starts_with("CLM-"));
    assert_eq!(body["status"], "estimate-received");
    assert_eq!(body["submittedBy"], "mike.davis");
    assert_eq!(body["estimatedDamage"], 2500.5);
    assert_eq!(body["nextSteps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_claim_estimate_validation() {
    let server = common::create_test_server().await;
    let token = server.token_for("user1", "user");

    let body: Value = AxumTestRequest::post("/api/claims/estimate")
        .bearer(&token)
        .json(&json!({"incidentType": "vehicle", "estimatedDamage": 100}))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");

    let body: Value = AxumTestRequest::post("/api/claims/estimate")
        .bearer(&token)
        .json(&json!({"policyId": "INS-1", "incidentType": "fire", "estimatedDamage": -100}))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "INVALID_INPUT");

    AxumTestRequest::post("/api/claims/estimate")
        .json(&json!({"policyId": "INS-1", "incidentType": "fire", "estimatedDamage": 10}))
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_coverage_details() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/coverage/details")
        .bearer(&server.token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["policyType"], "Auto Insurance");
    assert_eq!(body["status"], "Active");
    assert_eq!(body["coverage"]["collision"]["deductible"], "$500");
}

// ============================================================================
// Support contact
// ============================================================================

#[tokio::test]
async fn test_support_contact_is_anonymous() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::post("/api/support/contact")
        .json(&json!({"name": "Jane", "email": "jane@example.com", "message": "Help"}))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(body["ticketId"].as_str().unwrap().starts_with("TKT-"));
    assert_eq!(body["submittedBy"], "anonymous");
}

#[tokio::test]
async fn test_support_contact_validation() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::post("/api/support/contact")
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");

    let body: Value = AxumTestRequest::post("/api/support/contact")
        .json(&json!({"name": "Jane", "email": "jane@example.com"}))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");

    let body: Value = AxumTestRequest::post("/api/support/contact")
        .json(&json!({"name": "Jane", "email": "not-an-email", "message": "Help"}))
        .send(server.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "INVALID_FORMAT");
}

// ============================================================================
// Document preview
// ============================================================================

#[tokio::test]
async fn test_preview_canned_content_by_default() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::post("/api/documents/preview")
        .json(&json!({"url": "http://169.254.169.254/latest/meta-data/"}))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["source"], "http://169.254.169.254/latest/meta-data/");
    assert!(body["content"].as_str().is_some());
    assert!(body["fetchedAt"].is_string());
}

#[tokio::test]
async fn test_preview_live_fetch_reaches_loopback() {
    let internal_url = spawn_internal_page().await;
    let server = common::create_test_server_with(|config| config.preview.live_fetch = true).await;

    let body: Value = AxumTestRequest::post("/api/documents/preview")
        .json(&json!({"url": internal_url}))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(
        body["content"],
        "instance-id: i-0123456789; role: insurance-prod"
    );
    assert_eq!(body["source"], internal_url.as_str());
}

#[tokio::test]
async fn test_preview_failure_verbosity() {
    let verbose = common::create_test_server_with(|config| config.preview.live_fetch = true).await;
    let body: Value = AxumTestRequest::post("/api/documents/preview")
        .json(&json!({"url": "not a url"}))
        .send(verbose.router())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .json();
    assert_eq!(body["code"], "PREVIEW_ERROR");
    assert!(body.get("details").is_some());

    let quiet = common::create_test_server_with(|config| {
        config.preview.live_fetch = true;
        config.errors.verbose = false;
    })
    .await;
    let body: Value = AxumTestRequest::post("/api/documents/preview")
        .json(&json!({"url": "not a url"}))
        .send(quiet.router())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .json();
    assert_eq!(body["code"], "PREVIEW_ERROR");
    assert!(body.get("details").is_none());
    assert!(body.get("stack").is_none());
}

// ============================================================================
// Discovery, fallback and middleware
// ============================================================================

#[tokio::test]
async fn test_health_and_discovery() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/health")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Insurance API Backend is running");

    let body: Value = AxumTestRequest::get("/api/")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["endpoints"]["admin"]["reports"]["admin"], true);
    assert_eq!(body["endpoints"]["policies"]["details"]["auth"], false);

    let body: Value = AxumTestRequest::get("/")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Insurance API Backend");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/does/not/exist?x=1")
        .send(server.router())
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(body["message"], "Route /api/does/not/exist?x=1 not found");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = common::create_test_server().await;

    let response = AxumTestRequest::get("/api/health")
        .header("x-request-id", "trace-me-123")
        .send(server.router())
        .await;
    assert_eq!(response.header("x-request-id").as_deref(), Some("trace-me-123"));

    let response = AxumTestRequest::get("/api/health").send(server.router()).await;
    let generated = response.header("x-request-id").unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_cors_mirrors_unlisted_origin_with_credentials() {
    let server = common::create_test_server().await;

    for origin in ["http://localhost:3000", "http://evil.test"] {
        let response = AxumTestRequest::get("/api/health")
            .header("origin", origin)
            .send(server.router())
            .await
            .assert_status(StatusCode::OK);
        assert_eq!(
            response.header("access-control-allow-origin").as_deref(),
            Some(origin)
        );
        assert_eq!(
            response.header("access-control-allow-credentials").as_deref(),
            Some("true")
        );
    }
}
