// ABOUTME: Probe confirming the correctly protected member endpoints enforce tokens and validation
// ABOUTME: Serves as the control group next to the deliberately weak routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use super::{ProbeClient, ProbeReport, ProbeResponse, Verdict};

fn expect_status(response: &ProbeResponse, expected: StatusCode) -> Verdict {
    if response.status == expected {
        Verdict::Secure
    } else {
        Verdict::Inconclusive
    }
}

/// Run the control checks
///
/// # Errors
///
/// Returns an error if the server cannot be reached or the user1 login fails
pub async fn run(client: &ProbeClient) -> Result<ProbeReport> {
    let mut report = ProbeReport::new(
        "Secure endpoints",
        "Control: authentication and validation enforced",
    );

    let categories = client.get("/api/policies/categories", None).await?;
    let names: Vec<&str> = categories
        .body
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    report.push(
        "GET /api/policies/categories (public)",
        expect_status(&categories, StatusCode::OK),
        names.join(", "),
    );

    let anonymous = client.get("/api/user/notifications", None).await?;
    let verdict = if anonymous.is_success() {
        Verdict::Vulnerable
    } else {
        expect_status(&anonymous, StatusCode::UNAUTHORIZED)
    };
    report.push(
        "GET /api/user/notifications without a token",
        verdict,
        anonymous.describe(),
    );

    let token = client.login("user1", "userpass").await?;

    let notifications = client
        .get("/api/user/notifications", Some(&token))
        .await?;
    report.push(
        "GET /api/user/notifications with a token",
        expect_status(&notifications, StatusCode::OK),
        format!(
            "{} notifications",
            notifications.body.as_array().map_or(0, Vec::len)
        ),
    );

    let coverage = client.get("/api/coverage/details", Some(&token)).await?;
    report.push(
        "GET /api/coverage/details with a token",
        expect_status(&coverage, StatusCode::OK),
        format!(
            "{} {} ({})",
            coverage.str_field("policyNumber"),
            coverage.str_field("policyType"),
            coverage.str_field("status")
        ),
    );

    let estimate = client
        .send(
            Method::POST,
            "/api/claims/estimate",
            Some(&token),
            Some(&json!({
                "policyId": "INS-123456",
                "incidentType": "vehicle",
                "estimatedDamage": 3000
            })),
        )
        .await?;
    report.push(
        "POST /api/claims/estimate with valid data",
        expect_status(&estimate, StatusCode::CREATED),
        format!(
            "{} {} by {}",
            estimate.str_field("claimId"),
            estimate.str_field("status"),
            estimate.str_field("submittedBy")
        ),
    );

    let invalid = client
        .send(
            Method::POST,
            "/api/claims/estimate",
            Some(&token),
            Some(&json!({
                "policyId": "",
                "incidentType": "vehicle",
                "estimatedDamage": -100
            })),
        )
        .await?;
    let verdict = if invalid.is_success() {
        Verdict::Vulnerable
    } else {
        expect_status(&invalid, StatusCode::BAD_REQUEST)
    };
    report.push(
        "POST /api/claims/estimate with an empty policy id and negative damage",
        verdict,
        invalid.describe(),
    );

    Ok(report)
}
