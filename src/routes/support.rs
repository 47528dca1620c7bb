// ABOUTME: Support contact form route accepting anonymous submissions
// ABOUTME: Validates presence of fields and the email shape but never the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{Arc, LazyLock};

use axum::{routing::post, Json, Router};
use bytes::Bytes;
use chrono::Utc;
use insurance_core::errors::{AppError, AppResult};
use regex::Regex;
use serde_json::{json, Value};
use tracing::info;

use crate::resources::ServerResources;
use crate::routes::{parse_object_body, string_field};

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Whether `email` has the `local@domain.tld` shape
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Support routes
pub struct SupportRoutes;

impl SupportRoutes {
    /// Create support routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/support/contact", post(Self::handle_contact))
            .with_state(resources)
    }

    async fn handle_contact(body: Bytes) -> AppResult<Json<Value>> {
        let body = parse_object_body(&body)?.ok_or_else(|| {
            AppError::missing_field("Please provide contact information")
                .with_detail("reason", "Request body is missing")
        })?;

        let (Some(name), Some(email), Some(_message)) = (
            string_field(&body, "name"),
            string_field(&body, "email"),
            string_field(&body, "message"),
        ) else {
            return Err(AppError::missing_field(
                "Name, email, and message are required",
            ));
        };

        if !is_valid_email(email) {
            return Err(AppError::invalid_format(
                "Please provide a valid email address",
            ));
        }

        let now = Utc::now();
        let ticket_id = format!("TKT-{}", now.timestamp_millis());
        info!(ticket_id = %ticket_id, name = %name, "anonymous support ticket submitted");

        Ok(Json(json!({
            "message": "Contact form submitted successfully",
            "ticketId": ticket_id,
            "submittedAt": now.to_rfc3339(),
            "submittedBy": "anonymous",
            "vulnerability": "Missing authentication on contact endpoint"
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }
}
