// ABOUTME: Bearer-token extractors for axum handlers, one per verification strength
// ABOUTME: Strict (403 on bad token), verified (401), expiry-ignoring, and signature-free decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Token extractors
//!
//! Each protected route declares how much of the bearer token it checks by
//! the extractor it takes:
//!
//! | Extractor              | Signature | Expiry | Bad token  |
//! |------------------------|-----------|--------|------------|
//! | [`AuthenticatedUser`]  | yes       | yes    | 403        |
//! | [`VerifiedClaims`]     | yes       | yes    | 401        |
//! | [`ClaimsIgnoringExpiry`] | yes     | no     | 401        |
//! | [`UnverifiedClaims`]   | no        | no     | 401        |
//!
//! A missing token is always 401 `AUTH_REQUIRED`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderMap;
use insurance_core::errors::{AppError, ErrorCode};
use insurance_core::models::Claims;
use tracing::{debug, Span};

use crate::auth::{AuthManager, JwtValidationError};
use crate::resources::ServerResources;

/// Second space-separated part of the `Authorization` header
///
/// The scheme word is not checked: `Token abc` yields `abc` just like
/// `Bearer abc`.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

fn require_token(parts: &Parts) -> Result<&str, AppError> {
    extract_bearer_token(&parts.headers).ok_or_else(AppError::auth_required)
}

fn record_user(claims: &Claims) {
    Span::current().record("username", claims.username.as_str());
}

fn expired_error(err: &JwtValidationError) -> Option<AppError> {
    match err {
        JwtValidationError::TokenExpired { expired_at, .. } => Some(
            AppError::token_expired().with_detail("expiredAt", expired_at.to_rfc3339()),
        ),
        _ => None,
    }
}

/// Fully verified caller; invalid tokens are rejected with 403
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = require_token(parts)?;
        match resources.auth_manager.verify(token) {
            Ok(claims) => {
                record_user(&claims);
                Ok(Self(claims))
            }
            Err(err) => Err(expired_error(&err).unwrap_or_else(|| {
                debug!("rejecting token: {err}");
                AppError::new(ErrorCode::TokenRejected, "Invalid or malformed token")
            })),
        }
    }
}

/// Verified claims; every verification failure is a 401
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for VerifiedClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = require_token(parts)?;
        match resources.auth_manager.verify(token) {
            Ok(claims) => {
                record_user(&claims);
                Ok(Self(claims))
            }
            Err(err) => Err(expired_error(&err)
                .unwrap_or_else(|| AppError::invalid_token("Token verification failed"))),
        }
    }
}

/// Signature-checked claims that may be past their `exp`
#[derive(Debug, Clone)]
pub struct ClaimsIgnoringExpiry(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for ClaimsIgnoringExpiry {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = require_token(parts)?;
        let claims = resources
            .auth_manager
            .verify_ignoring_expiry(token)
            .map_err(|_| AppError::invalid_token("Token verification failed"))?;
        record_user(&claims);
        Ok(Self(claims))
    }
}

/// Claims decoded without any signature check
#[derive(Debug, Clone)]
pub struct UnverifiedClaims(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for UnverifiedClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let token = require_token(parts)?;
        let claims = AuthManager::decode_unverified(token)
            .map_err(|_| AppError::invalid_token("Token could not be decoded"))?;
        record_user(&claims);
        Ok(Self(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers("Token abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
