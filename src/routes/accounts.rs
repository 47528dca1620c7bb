// ABOUTME: Account overview route for signed-in customers
// ABOUTME: Verifies the token signature but accepts tokens past their expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::Value;

use crate::logging::AppLogger;
use crate::middleware::ClaimsIgnoringExpiry;
use crate::mock_data;
use crate::resources::ServerResources;

/// Account routes
pub struct AccountRoutes;

impl AccountRoutes {
    /// Create account routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/accounts/overview", get(Self::handle_overview))
            .with_state(resources)
    }

    async fn handle_overview(ClaimsIgnoringExpiry(claims): ClaimsIgnoringExpiry) -> Json<Value> {
        if claims.is_expired_at(Utc::now()) {
            AppLogger::log_security_event(
                "expired-token-accepted",
                "/api/accounts/overview",
                &format!("token expired at unix {}", claims.exp),
                Some(&claims.username),
            );
        }
        Json(mock_data::account_overview(&claims.role))
    }
}
