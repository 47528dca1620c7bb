// ABOUTME: HTTP middleware for request tracing, bearer-token extraction, role checks and CORS
// ABOUTME: Provides request ID propagation, per-request spans and the token extractors used by handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Role checks applied inside handlers
pub mod admin_guard;
/// Bearer-token extractors with different verification strength
pub mod auth;
/// CORS configuration
pub mod cors;
/// Request ID generation and propagation
pub mod request_id;
/// Per-request tracing spans
pub mod tracing;

pub use admin_guard::{require_admin, require_admin_role};
pub use auth::{
    extract_bearer_token, AuthenticatedUser, ClaimsIgnoringExpiry, UnverifiedClaims,
    VerifiedClaims,
};
pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId};
pub use tracing::{create_request_span, http_trace_layer};
