// ABOUTME: Registration, login, profile and user listing route handlers
// ABOUTME: Registration stores any password as-is; the user list is admin-only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! Login and registration both answer with a fresh 15 minute token. The
//! profile and user-list handlers use the strict [`AuthenticatedUser`]
//! extractor, which rejects bad tokens with 403 and expired ones with 401.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use insurance_core::constants::auth::TOKEN_LIFETIME_LABEL;
use insurance_core::errors::{AppError, AppResult};
use insurance_core::models::{PublicUser, User};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::logging::AppLogger;
use crate::middleware::{require_admin, AuthenticatedUser};
use crate::resources::ServerResources;
use crate::routes::{parse_object_body_or_empty, string_field};

/// Passwords shorter than this are accepted but logged
const WEAK_PASSWORD_LENGTH: usize = 8;

/// Response to a successful login or registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Outcome message
    pub message: &'static str,
    /// Signed session token
    pub token: String,
    /// The authenticated account
    pub user: PublicUser,
    /// Token lifetime label
    pub expires_in: &'static str,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/profile", get(Self::handle_profile))
            .route("/api/auth/users", get(Self::handle_list_users))
            .with_state(resources)
    }

    fn credentials(body: &Bytes) -> AppResult<(String, String)> {
        let body = parse_object_body_or_empty(body)?;
        match (string_field(&body, "username"), string_field(&body, "password")) {
            (Some(username), Some(password)) => Ok((username.to_owned(), password.to_owned())),
            _ => Err(AppError::missing_field("Username and password are required")),
        }
    }

    fn issue_token(resources: &ServerResources, user: &User) -> AppResult<String> {
        resources.auth_manager.generate_token(user).map_err(|e| {
            resources.surface_error(
                AppError::internal("An error occurred while signing the token")
                    .with_error_chain(&e)
                    .with_source(e),
            )
        })
    }

    /// Handle user registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> AppResult<impl IntoResponse> {
        let (username, password) = Self::credentials(&body)?;

        if password.len() < WEAK_PASSWORD_LENGTH {
            AppLogger::log_security_event(
                "weak-password-policy",
                "/api/auth/register",
                &format!("registered with a {} character password", password.len()),
                Some(&username),
            );
        }

        let user = resources
            .user_store
            .register(&username, &password)
            .await
            .map_err(|e| resources.surface_error(AppError::from(e)))?;
        AppLogger::log_auth_event(&user.username, "register", true, None);

        let token = Self::issue_token(&resources, &user)?;
        Ok((
            StatusCode::CREATED,
            Json(TokenResponse {
                message: "Registration successful",
                token,
                user: PublicUser::from(&user),
                expires_in: TOKEN_LIFETIME_LABEL,
            }),
        ))
    }

    /// Handle username/password login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> AppResult<Json<TokenResponse>> {
        let (username, password) = Self::credentials(&body)?;

        let Some(user) = resources.user_store.authenticate(&username, &password).await else {
            AppLogger::log_auth_event(&username, "login", false, Some("invalid credentials"));
            return Err(AppError::auth_failed());
        };
        AppLogger::log_auth_event(&user.username, "login", true, None);

        let token = Self::issue_token(&resources, &user)?;
        Ok(Json(TokenResponse {
            message: "Login successful",
            token,
            user: PublicUser::from(&user),
            expires_in: TOKEN_LIFETIME_LABEL,
        }))
    }

    /// Return the caller's identity and token timestamps
    async fn handle_profile(AuthenticatedUser(claims): AuthenticatedUser) -> impl IntoResponse {
        let to_rfc3339 = |ts: Option<DateTime<Utc>>| ts.map(|t| t.to_rfc3339());
        let issued_at = to_rfc3339(claims.issued_at());
        let expires_at = to_rfc3339(claims.expires_at());
        Json(json!({
            "message": "Profile retrieved successfully",
            "user": {
                "username": claims.username,
                "role": claims.role
            },
            "tokenInfo": {
                "issuedAt": issued_at,
                "expiresAt": expires_at
            }
        }))
    }

    /// List stored users without passwords
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        AuthenticatedUser(claims): AuthenticatedUser,
    ) -> AppResult<impl IntoResponse> {
        require_admin(&claims)?;

        let users: Vec<PublicUser> = resources
            .user_store
            .load_users()
            .await
            .iter()
            .map(PublicUser::from)
            .collect();
        info!(admin = %claims.username, count = users.len(), "listing users");

        Ok(Json(json!({
            "message": "Users retrieved successfully",
            "count": users.len(),
            "users": users
        })))
    }
}
