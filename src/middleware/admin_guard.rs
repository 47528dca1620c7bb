// ABOUTME: Role checks for admin-only handlers
// ABOUTME: Compares role strings taken from claims or from request-derived effective roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use insurance_core::errors::{AppError, AppResult};
use insurance_core::models::{Claims, Role};
use tracing::warn;

/// Require the `admin` role in verified claims
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` (403) for any other role
pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.is_admin() {
        return Ok(());
    }
    warn!(
        username = %claims.username,
        role = %claims.role,
        "Non-admin user attempted admin operation"
    );
    Err(AppError::permission_denied("Admin privileges required"))
}

/// Require that `role` is `admin` for access to `resource`
///
/// # Errors
///
/// Returns `ADMIN_ACCESS_REQUIRED` (403) for any other role
pub fn require_admin_role(role: &str, resource: &str) -> AppResult<()> {
    if role == Role::Admin.as_str() {
        return Ok(());
    }
    Err(AppError::admin_access_required(format!(
        "Admin privileges required to access {resource}"
    )))
}
