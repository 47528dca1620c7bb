// ABOUTME: Customer profile route built from bearer token claims
// ABOUTME: The token payload is decoded without verifying its signature
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::logging::AppLogger;
use crate::middleware::UnverifiedClaims;
use crate::mock_data::{self, CustomerProfile};
use crate::resources::ServerResources;

/// Customer routes
pub struct CustomerRoutes;

impl CustomerRoutes {
    /// Create customer routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/customers/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Profile for whoever the unverified token claims to be
    async fn handle_me(UnverifiedClaims(claims): UnverifiedClaims) -> Json<CustomerProfile> {
        AppLogger::log_security_event(
            "jwt-signature-bypass",
            "/api/customers/me",
            &format!("claims accepted without signature check (role {})", claims.role),
            Some(&claims.username),
        );
        Json(mock_data::customer_profile(&claims))
    }
}
