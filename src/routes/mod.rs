// ABOUTME: Route module organization for the insurance portal HTTP endpoints
// ABOUTME: One routes struct per domain plus the lenient JSON body helpers they share
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the insurance portal
//!
//! Each domain module exposes a `XRoutes::routes(resources)` constructor
//! returning a fully-stated [`axum::Router`]; the server merges them.
//! Bodies are taken as raw bytes and parsed here so that malformed or absent
//! JSON produces the same flat error body as every other failure.

/// Account overview (expired tokens accepted)
pub mod accounts;
/// Admin statistics, settings and reports
pub mod admin;
/// Registration, login, profile and user listing
pub mod auth;
/// Customer profile (signature not checked)
pub mod customers;
/// Document preview (server-side fetch)
pub mod documents;
/// Banner, discovery and health endpoints
pub mod health;
/// Notifications, claim estimates and coverage for signed-in members
pub mod member;
/// Policy categories, search and PII records
pub mod policies;
/// Support contact form
pub mod support;

pub use accounts::AccountRoutes;
pub use admin::AdminRoutes;
pub use auth::AuthRoutes;
pub use customers::CustomerRoutes;
pub use documents::DocumentRoutes;
pub use health::HealthRoutes;
pub use member::MemberRoutes;
pub use policies::PolicyRoutes;
pub use support::SupportRoutes;

use bytes::Bytes;
use insurance_core::errors::{AppError, AppResult};
use serde_json::{Map, Value};

/// JSON object body of a request
pub type JsonObject = Map<String, Value>;

/// Parse an optional JSON object body
///
/// An empty or whitespace-only body yields `None`.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the body is not JSON or not a JSON object
pub fn parse_object_body(body: &Bytes) -> AppResult<Option<JsonObject>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(AppError::invalid_input("Request body must be a JSON object")),
    }
}

/// Parse a JSON object body, treating an absent body as `{}`
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the body is not JSON or not a JSON object
pub fn parse_object_body_or_empty(body: &Bytes) -> AppResult<JsonObject> {
    parse_object_body(body).map(Option::unwrap_or_default)
}

/// Non-empty string value of `key`
#[must_use]
pub fn string_field<'a>(body: &'a JsonObject, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Loose truthiness of a JSON value: `null`, `false`, `0`, `""` are false
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_none() {
        assert!(parse_object_body(&Bytes::new()).unwrap().is_none());
        assert!(parse_object_body(&Bytes::from_static(b"  \n")).unwrap().is_none());
        assert!(parse_object_body_or_empty(&Bytes::new()).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(parse_object_body(&Bytes::from_static(b"[1,2]")).is_err());
        assert!(parse_object_body(&Bytes::from_static(b"{not json")).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("admin")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
    }
}
