// ABOUTME: Admin statistics, settings and reports route handlers
// ABOUTME: Each handler applies a different strength of role checking to the caller's token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Admin routes
//!
//! | Route                         | Token        | Role check                        |
//! |-------------------------------|--------------|-----------------------------------|
//! | `GET /api/admin/stats`        | none         | none                              |
//! | `GET /api/admin/settings`     | verified     | none                              |
//! | `PUT/PATCH /api/admin/settings` | verified   | token role, or `isAdmin`/`role` in the body |
//! | `GET /api/admin/reports`      | verified     | token role must be `admin`        |
//! | `DELETE /api/admin/reports`   | verified     | none                              |

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use insurance_core::errors::AppResult;
use insurance_core::models::{Claims, Role};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::admin_settings::UpdateMode;
use crate::logging::AppLogger;
use crate::middleware::{require_admin_role, VerifiedClaims};
use crate::mock_data;
use crate::resources::ServerResources;
use crate::routes::{is_truthy, parse_object_body_or_empty, JsonObject};

/// Admin routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/admin/stats", get(Self::handle_stats))
            .route(
                "/api/admin/settings",
                get(Self::handle_get_settings)
                    .put(Self::handle_put_settings)
                    .patch(Self::handle_patch_settings),
            )
            .route(
                "/api/admin/reports",
                get(Self::handle_get_reports).delete(Self::handle_clear_reports),
            )
            .with_state(resources)
    }

    /// Statistics, served to anyone
    async fn handle_stats() -> Json<Value> {
        AppLogger::log_security_event(
            "broken-function-level-authorization",
            "/api/admin/stats",
            "admin statistics served without a token",
            None,
        );
        Json(mock_data::admin_stats())
    }

    /// Settings for any verified caller, whatever their role
    async fn handle_get_settings(
        State(resources): State<Arc<ServerResources>>,
        VerifiedClaims(claims): VerifiedClaims,
    ) -> Json<Value> {
        if !claims.is_admin() {
            AppLogger::log_security_event(
                "broken-function-level-authorization",
                "/api/admin/settings",
                &format!("admin settings read with role {}", claims.role),
                Some(&claims.username),
            );
        }
        Json(resources.settings.overlay(mock_data::admin_settings_base()))
    }

    async fn handle_put_settings(
        State(resources): State<Arc<ServerResources>>,
        VerifiedClaims(claims): VerifiedClaims,
        body: Bytes,
    ) -> AppResult<Json<Value>> {
        Self::update_settings(&resources, &claims, &body, UpdateMode::Replace)
    }

    async fn handle_patch_settings(
        State(resources): State<Arc<ServerResources>>,
        VerifiedClaims(claims): VerifiedClaims,
        body: Bytes,
    ) -> AppResult<Json<Value>> {
        Self::update_settings(&resources, &claims, &body, UpdateMode::Merge)
    }

    /// Role the request is treated as having
    ///
    /// A body carrying `isAdmin: true` or `role: "admin"` is treated as admin
    /// no matter what the token says.
    fn effective_role(incoming: &JsonObject, claims: &Claims) -> String {
        let requested_admin = incoming.get("isAdmin") == Some(&Value::Bool(true))
            || incoming.get("role").and_then(Value::as_str) == Some(Role::Admin.as_str());
        if requested_admin {
            Role::Admin.as_str().to_owned()
        } else {
            claims.role.clone()
        }
    }

    /// Store every submitted field and echo the caller's claimed identity
    fn update_settings(
        resources: &ServerResources,
        claims: &Claims,
        body: &Bytes,
        mode: UpdateMode,
    ) -> AppResult<Json<Value>> {
        let mut incoming = parse_object_body_or_empty(body)?;
        let effective_role = Self::effective_role(&incoming, claims);
        info!(
            username = %claims.username,
            token_role = %claims.role,
            effective_role = %effective_role,
            "admin settings update"
        );
        require_admin_role(&effective_role, "settings")?;

        if !claims.is_admin() {
            AppLogger::log_security_event(
                "mass-assignment",
                "/api/admin/settings",
                "role elevated by fields in the request body",
                Some(&claims.username),
            );
        }

        incoming.insert("updatedBy".to_owned(), Value::String(claims.username.clone()));
        incoming.insert("updatedAt".to_owned(), Value::String(Utc::now().to_rfc3339()));
        let settings = resources.settings.apply(&claims.username, incoming, mode);

        let role = settings
            .get("role")
            .filter(|value| is_truthy(value))
            .cloned()
            .unwrap_or_else(|| Value::String(effective_role.clone()));
        let is_admin = settings
            .get("isAdmin")
            .filter(|value| is_truthy(value))
            .cloned()
            .unwrap_or(Value::Bool(effective_role == Role::Admin.as_str()));

        Ok(Json(json!({
            "message": "Admin settings updated successfully",
            "settings": settings,
            "user": {
                "username": claims.username,
                "role": role,
                "isAdmin": is_admin
            }
        })))
    }

    /// Reports, admin role required
    async fn handle_get_reports(VerifiedClaims(claims): VerifiedClaims) -> AppResult<Json<Value>> {
        require_admin_role(&claims.role, "reports")?;
        Ok(Json(mock_data::admin_reports()))
    }

    /// Clearing reports checks the token but not the role
    async fn handle_clear_reports(VerifiedClaims(claims): VerifiedClaims) -> Json<Value> {
        if claims.is_admin() {
            info!(username = %claims.username, "admin cleared reports archive");
        } else {
            warn!(
                username = %claims.username,
                role = %claims.role,
                "reports archive cleared by non-admin"
            );
            AppLogger::log_security_event(
                "http-method-bypass",
                "/api/admin/reports",
                "DELETE accepted without a role check",
                Some(&claims.username),
            );
        }
        Json(mock_data::cleared_reports(&claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> Claims {
        Claims {
            username: "user1".into(),
            role: role.into(),
            iat: 0,
            exp: 0,
        }
    }

    fn body(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        }
    }

    #[test]
    fn test_effective_role_from_body() {
        let user = claims("user");
        assert_eq!(AdminRoutes::effective_role(&body(json!({})), &user), "user");
        assert_eq!(
            AdminRoutes::effective_role(&body(json!({"isAdmin": true})), &user),
            "admin"
        );
        assert_eq!(
            AdminRoutes::effective_role(&body(json!({"role": "admin"})), &user),
            "admin"
        );
        assert_eq!(
            AdminRoutes::effective_role(&body(json!({"isAdmin": "true"})), &user),
            "user"
        );
    }
}
