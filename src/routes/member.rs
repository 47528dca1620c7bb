// ABOUTME: Notification, claim estimate and coverage routes for signed-in members
// ABOUTME: These handlers verify the token signature and expiry before answering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Member routes
//!
//! The correctly protected part of the portal. Any verification failure is a
//! 401, with `TOKEN_EXPIRED` distinguished from `INVALID_TOKEN`.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use insurance_core::errors::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::middleware::VerifiedClaims;
use crate::mock_data::{self, Notification, CLAIM_NEXT_STEPS};
use crate::resources::ServerResources;
use crate::routes::{is_truthy, parse_object_body_or_empty, JsonObject};

/// Filed claim estimate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEstimate {
    /// `CLM-<year>-<nnnn>`
    pub claim_id: String,
    /// Always `estimate-received`
    pub status: &'static str,
    /// Username from the token
    pub submitted_by: String,
    /// Filing time
    pub submitted_at: String,
    /// Policy the claim is against, as submitted
    pub policy_id: Value,
    /// Incident type, as submitted
    pub incident_type: Value,
    /// Estimated damage amount
    pub estimated_damage: f64,
    /// What happens next
    pub next_steps: [&'static str; 3],
}

/// Positive damage amount from a JSON number or numeric string
fn parse_damage(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn required(body: &JsonObject, key: &str) -> AppResult<Value> {
    body.get(key)
        .filter(|value| is_truthy(value))
        .cloned()
        .ok_or_else(|| AppError::missing_field(format!("{key} is required")))
}

/// Member routes
pub struct MemberRoutes;

impl MemberRoutes {
    /// Create member routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/user/notifications", get(Self::handle_notifications))
            .route("/api/claims/estimate", post(Self::handle_claim_estimate))
            .route("/api/coverage/details", get(Self::handle_coverage))
            .with_state(resources)
    }

    async fn handle_notifications(_claims: VerifiedClaims) -> Json<Vec<Notification>> {
        Json(mock_data::notifications())
    }

    async fn handle_claim_estimate(
        VerifiedClaims(claims): VerifiedClaims,
        body: Bytes,
    ) -> AppResult<impl IntoResponse> {
        let body = parse_object_body_or_empty(&body)?;
        let policy_id = required(&body, "policyId")?;
        let incident_type = required(&body, "incidentType")?;
        let estimated_damage = parse_damage(body.get("estimatedDamage")).ok_or_else(|| {
            AppError::invalid_input("estimatedDamage must be a positive number")
        })?;

        let estimate = ClaimEstimate {
            claim_id: mock_data::claim_id(),
            status: "estimate-received",
            submitted_by: claims.username,
            submitted_at: Utc::now().to_rfc3339(),
            policy_id,
            incident_type,
            estimated_damage,
            next_steps: CLAIM_NEXT_STEPS,
        };
        info!(
            claim_id = %estimate.claim_id,
            username = %estimate.submitted_by,
            amount = estimated_damage,
            "claim estimate received"
        );
        Ok((StatusCode::CREATED, Json(estimate)))
    }

    async fn handle_coverage(_claims: VerifiedClaims) -> Json<Value> {
        Json(mock_data::coverage_details())
    }
}
