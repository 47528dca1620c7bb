// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds isolated servers over temporary user files and mints test tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `insurance_api_lab`
//!
//! Every test server gets its own temporary directory holding a freshly
//! seeded user file, so registrations never leak between tests.

use std::env;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use axum::Router;
use chrono::{Duration, Utc};
use insurance_api_lab::{
    config::ServerConfig,
    models::Claims,
    resources::ServerResources,
    server::{build_router, serve_on},
};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration pointing at a user file inside `dir`
pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.http.host = "127.0.0.1".to_owned();
    config.http.port = 0;
    config.storage.users_file = dir.path().join("data").join("users.json");
    config
}

/// A server's shared resources plus the directory its user file lives in
pub struct TestServer {
    pub resources: Arc<ServerResources>,
    _dir: TempDir,
}

impl TestServer {
    /// Router over this server's resources
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.resources))
    }

    /// Token signed with the server secret
    pub fn sign(&self, claims: &Claims) -> String {
        self.resources.auth_manager.sign_claims(claims).unwrap()
    }

    /// Valid 15 minute token for `username` with `role`
    pub fn token_for(&self, username: &str, role: &str) -> String {
        let now = Utc::now();
        self.sign(&Claims {
            username: username.to_owned(),
            role: role.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(15)).timestamp(),
        })
    }

    /// Correctly signed token that expired an hour ago
    pub fn expired_token_for(&self, username: &str, role: &str) -> String {
        let now = Utc::now();
        self.sign(&Claims {
            username: username.to_owned(),
            role: role.to_owned(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        })
    }
}

/// Seeded server with default configuration
pub async fn create_test_server() -> TestServer {
    create_test_server_with(|_| {}).await
}

/// Seeded server with `configure` applied to the default test configuration
pub async fn create_test_server_with(configure: impl FnOnce(&mut ServerConfig)) -> TestServer {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(&dir);
    configure(&mut config);

    let resources = Arc::new(ServerResources::new(config).expect("Failed to build resources"));
    resources
        .user_store
        .ensure_seeded()
        .await
        .expect("Failed to seed users");

    TestServer {
        resources,
        _dir: dir,
    }
}

/// Serve `server` on an ephemeral loopback port and return its base URL
pub async fn spawn_server(server: &TestServer) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let resources = Arc::clone(&server.resources);
    tokio::spawn(async move {
        let _ = serve_on(listener, resources).await;
    });
    format!("http://{addr}")
}
