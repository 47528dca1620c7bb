// ABOUTME: End-to-end tests running the traffic simulator against a loopback API server
// ABOUTME: One zero-delay round over every known account, checking logins and recorded traffic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use insurance_api_lab::auth::AuthManager;
use insurance_api_lab::models::{Role, User};
use insurance_api_lab::simulator::{SimulatorConfig, TrafficSimulator, KNOWN_ACCOUNTS};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::timeout;

fn fast_config(base_url: String, users: usize) -> SimulatorConfig {
    SimulatorConfig {
        base_url,
        duration_minutes: 1.0,
        request_interval_ms: 0,
        concurrent_users: users,
        max_requests_per_user: 4,
        min_request_delay_ms: 0,
        max_request_delay_ms: 0,
        max_rounds: Some(1),
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_single_round_against_live_server() {
    let server = common::create_test_server().await;
    let base_url = common::spawn_server(&server).await;

    let simulator = TrafficSimulator::new(fast_config(base_url, KNOWN_ACCOUNTS.len())).unwrap();
    let rounds = simulator.run().await;
    assert_eq!(rounds, 1);

    let stats = simulator.snapshot().await;
    assert_eq!(stats.login_attempts, KNOWN_ACCOUNTS.len() as u64);
    // testuser1..3 are not seeded, so only the twelve stored accounts get in
    assert_eq!(stats.successful_logins, 12);
    assert_eq!(stats.authenticated_users.len(), 12);
    assert!(!stats.authenticated_users.contains("testuser1"));

    // Accounts without a session may also pick the registration endpoint
    let register = stats.endpoints.get("/api/auth/register").unwrap();
    assert!(register.success >= 1);
    assert!(stats.total_requests >= 1);
    assert_eq!(
        stats.total_requests,
        stats.successful_requests + stats.failed_requests
    );
    assert_eq!(stats.response_times_ms.len() as u64, stats.total_requests);
    assert_eq!(
        stats.auth_required_requests + stats.public_requests,
        stats.total_requests
    );

    let registered = server
        .resources
        .user_store
        .load_users()
        .await
        .into_iter()
        .filter(|user| user.username.starts_with("trafficuser"))
        .count();
    // Unlocked registrations can overwrite each other
    assert!(registered as u64 <= register.success);

    let summary = simulator.summary().await;
    assert!(summary.contains("Total Requests"));
}

/// Server whose logins succeed but which answers 401 to everything else
async fn spawn_rejecting_server() -> String {
    async fn login() -> Json<Value> {
        let token = AuthManager::with_default_lifetime(b"rejecting-server")
            .generate_token(&User::new("user1", "userpass", Role::User))
            .unwrap();
        Json(json!({ "token": token, "user": { "role": "user" } }))
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .fallback(|| async { StatusCode::UNAUTHORIZED });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_retried_requests_are_counted_once() {
    let base_url = spawn_rejecting_server().await;
    let mut config = fast_config(base_url, KNOWN_ACCOUNTS.len());
    config.max_requests_per_user = 10;

    let simulator = TrafficSimulator::new(config).unwrap();
    timeout(Duration::from_secs(30), simulator.run())
        .await
        .unwrap();

    let stats = simulator.snapshot().await;
    assert_eq!(stats.successful_requests, 0);
    assert_eq!(
        stats.auth_required_requests + stats.public_requests,
        stats.total_requests
    );
    // Every 401 on an authenticated endpoint triggers one extra login
    assert_eq!(
        stats.successful_logins,
        KNOWN_ACCOUNTS.len() as u64 + stats.auth_required_requests
    );
}

#[tokio::test]
async fn test_unreachable_target_counts_failures() {
    let simulator = TrafficSimulator::new(fast_config("http://127.0.0.1:9".to_owned(), 2)).unwrap();
    let rounds = timeout(Duration::from_secs(30), simulator.run())
        .await
        .unwrap();
    assert_eq!(rounds, 1);

    let stats = simulator.snapshot().await;
    assert_eq!(stats.login_attempts, 2);
    assert_eq!(stats.successful_logins, 0);
    assert_eq!(stats.successful_requests, 0);
    assert!(stats.endpoints["/api/auth/register"].failed >= 1);
    assert_eq!(stats.failed_requests, stats.total_requests);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut config = fast_config("http://localhost:3001".to_owned(), 0);
    assert!(TrafficSimulator::new(config.clone()).is_err());

    config.concurrent_users = 1;
    config.min_request_delay_ms = 10;
    config.max_request_delay_ms = 5;
    assert!(TrafficSimulator::new(config).is_err());
}
