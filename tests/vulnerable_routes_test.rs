// ABOUTME: Regression tests pinning every deliberate weakness of the portal routes
// ABOUTME: Signature and expiry bypass, missing auth, BOLA, BFLA, mass assignment and unbounded paging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use helpers::axum_test::AxumTestRequest;
use insurance_api_lab::models::Claims;
use insurance_api_lab::probes::token_tampering::swap_payload;
use serde_json::{json, Value};

fn admin_claims(username: &str) -> Claims {
    let now = Utc::now();
    Claims {
        username: username.to_owned(),
        role: "admin".to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(15)).timestamp(),
    }
}

// ============================================================================
// Token handling
// ============================================================================

#[tokio::test]
async fn test_customer_profile_trusts_forged_payload() {
    let server = common::create_test_server().await;
    let genuine = server.token_for("user1", "user");
    let forged = swap_payload(&genuine, &admin_claims("admin1")).unwrap();
    assert!(server.resources.auth_manager.verify(&forged).is_err());

    let body: Value = AxumTestRequest::get("/api/customers/me")
        .bearer(&forged)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["username"], "admin1");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["fullName"], "admin1 User");
    assert_eq!(body["email"], "admin1@example.com");
    assert_eq!(body["address"]["zipCode"], "90210");
}

#[tokio::test]
async fn test_customer_profile_accepts_unsigned_token() {
    let server = common::create_test_server().await;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"username":"john.smith","role":"superuser"}"#);
    let token = format!("{header}.{payload}.");

    let body: Value = AxumTestRequest::get("/api/customers/me")
        .bearer(&token)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["fullName"], "john smith");
    assert_eq!(body["role"], "superuser");
}

#[tokio::test]
async fn test_customer_profile_still_needs_some_token() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/customers/me")
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "AUTH_REQUIRED");

    let body: Value = AxumTestRequest::get("/api/customers/me")
        .bearer("garbage")
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_account_overview_accepts_expired_token() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/accounts/overview")
        .bearer(&server.expired_token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["accountType"], "Standard");

    let body: Value = AxumTestRequest::get("/api/accounts/overview")
        .bearer(&server.expired_token_for("admin1", "admin"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["accountType"], "Enterprise");
}

#[tokio::test]
async fn test_account_overview_checks_signature() {
    let server = common::create_test_server().await;
    let forged = swap_payload(&server.token_for("user1", "user"), &admin_claims("user1")).unwrap();

    let body: Value = AxumTestRequest::get("/api/accounts/overview")
        .bearer(&forged)
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "INVALID_TOKEN");
}

// ============================================================================
// Policies
// ============================================================================

#[tokio::test]
async fn test_my_policy_served_without_token() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/policies/mine")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["policyNumber"], "INS-123456");
    assert_eq!(body["ssn"], "123-45-6789");
    assert_eq!(body["emergencyContact"]["relationship"], "Spouse");
}

#[tokio::test]
async fn test_policy_by_id_is_stable_and_unauthenticated() {
    let server = common::create_test_server().await;

    let first: Value = AxumTestRequest::get("/api/policies/home-5678")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let second: Value = AxumTestRequest::get("/api/policies/home-5678")
        .send(server.router())
        .await
        .json();

    assert_eq!(first["policy"]["id"], "home-5678");
    assert_eq!(first["policy"]["holderName"], second["policy"]["holderName"]);
    assert_eq!(first["policy"]["ssn"], second["policy"]["ssn"]);
    assert!(first["policy"]["email"]
        .as_str()
        .unwrap()
        .ends_with("@example.com"));
}

#[tokio::test]
async fn test_search_has_no_page_size_ceiling() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/policies/search?query=&page=1&per_page=1500")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["policies"].as_array().unwrap().len(), 1500);
    assert_eq!(body["pagination"]["total"], 10_000);
    assert_eq!(body["pagination"]["per_page"], 1500);
    assert_eq!(body["pagination"]["totalPages"], 7);
    assert_eq!(body["searchQuery"], "");
}

#[tokio::test]
async fn test_search_filters_and_pages() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/policies/search?query=POL-000042")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let policies = body["policies"].as_array().unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0]["policyNumber"], "POL-000042");
    assert_eq!(body["pagination"]["per_page"], 10);

    let body: Value = AxumTestRequest::get("/api/policies/search?page=2000&per_page=10")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(body["policies"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["page"], 2000);

    let body: Value = AxumTestRequest::get("/api/policies/search?page=abc&per_page=-3")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["per_page"], 10);

    let body: Value = AxumTestRequest::get("/api/policies/search?per_page=0")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["pagination"]["per_page"], 10);
    assert_eq!(body["pagination"]["totalPages"], 1000);
    assert_eq!(body["policies"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_categories() {
    let server = common::create_test_server().await;

    let body: Vec<String> = AxumTestRequest::get("/api/policies/categories")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(body.iter().any(|category| category == "Auto"));
}

// ============================================================================
// Admin functions
// ============================================================================

#[tokio::test]
async fn test_admin_stats_without_token() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/admin/stats")
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["totalPolicies"], 4520);
}

#[tokio::test]
async fn test_admin_settings_readable_by_any_user() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/admin/settings")
        .bearer(&server.token_for("user2", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["databaseConfig"]["name"], "insurance_prod");

    let body: Value = AxumTestRequest::get("/api/admin/settings")
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_settings_update_refused_without_elevation() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::put("/api/admin/settings")
        .bearer(&server.token_for("user1", "user"))
        .json(&json!({"maintenanceMode": true}))
        .send(server.router())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["code"], "ADMIN_ACCESS_REQUIRED");
    assert!(server.resources.settings.is_empty());
}

#[tokio::test]
async fn test_settings_mass_assignment_elevates_role() {
    let server = common::create_test_server().await;
    let token = server.token_for("user1", "user");

    let body: Value = AxumTestRequest::put("/api/admin/settings")
        .bearer(&token)
        .json(&json!({"isAdmin": true, "maintenanceMode": true}))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["user"]["username"], "user1");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["isAdmin"], true);
    assert_eq!(body["settings"]["maintenanceMode"], true);
    assert_eq!(body["settings"]["updatedBy"], "user1");

    let body: Value = AxumTestRequest::get("/api/admin/settings")
        .bearer(&token)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["maintenanceMode"], true);
    assert_eq!(body["isAdmin"], true);
}

#[tokio::test]
async fn test_settings_put_replaces_and_patch_merges() {
    let server = common::create_test_server().await;
    let token = server.token_for("user2", "user");

    for payload in [
        json!({"role": "admin", "theme": "dark"}),
        json!({"role": "admin", "locale": "fr"}),
    ] {
        AxumTestRequest::put("/api/admin/settings")
            .bearer(&token)
            .json(&payload)
            .send(server.router())
            .await
            .assert_status(StatusCode::OK);
    }
    let held = server.resources.settings.overrides_for("user2").unwrap();
    assert!(held.get("theme").is_none());
    assert_eq!(held["locale"], "fr");

    let body: Value = AxumTestRequest::patch("/api/admin/settings")
        .bearer(&token)
        .json(&json!({"isAdmin": true, "theme": "light"}))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["settings"]["locale"], "fr");
    assert_eq!(body["settings"]["theme"], "light");
}

#[tokio::test]
async fn test_role_tampered_token_is_trusted() {
    let server = common::create_test_server().await;
    let elevated = server.sign(&admin_claims("user1"));

    let body: Value = AxumTestRequest::get("/api/auth/users")
        .bearer(&elevated)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["count"], 12);

    AxumTestRequest::get("/api/admin/reports")
        .bearer(&elevated)
        .send(server.router())
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_reports_get_requires_admin() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::get("/api/admin/reports")
        .bearer(&server.token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["code"], "ADMIN_ACCESS_REQUIRED");

    let body: Value = AxumTestRequest::get("/api/admin/reports")
        .bearer(&server.token_for("admin1", "admin"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["reportPeriod"], "January 2024");
}

#[tokio::test]
async fn test_reports_delete_skips_role_check() {
    let server = common::create_test_server().await;

    let body: Value = AxumTestRequest::delete("/api/admin/reports")
        .bearer(&server.token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["clearedBy"], "user1");
    assert_eq!(body["userRole"], "user");

    let body: Value = AxumTestRequest::delete("/api/admin/reports")
        .bearer(&server.expired_token_for("user1", "user"))
        .send(server.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}
