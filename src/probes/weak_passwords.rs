// ABOUTME: Probe registering accounts with trivial passwords and logging in with seeded weak ones
// ABOUTME: Any accepted registration reproduces the missing password strength policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde_json::json;

use super::{ProbeClient, ProbeReport, Verdict};

/// Passwords submitted at registration
pub const WEAK_PASSWORDS: &[&str] = &[
    "123", "123456", "password", "admin", "qwerty", "abc123", "test", "a", "", "12345", "pass",
    "user", "letmein", "welcome", "monkey", "dragon", "master", "football", "baseball", "shadow",
];

/// Seeded accounts with weak passwords
const WEAK_LOGINS: &[(&str, &str)] = &[
    ("weakuser1", "123"),
    ("weakuser2", "123456"),
    ("weakuser3", "password"),
];

/// Register one account per weak password, then log in as the weak seeded users
///
/// # Errors
///
/// Returns an error if the server cannot be reached
pub async fn run(client: &ProbeClient) -> Result<ProbeReport> {
    let mut report = ProbeReport::new(
        "Weak password registration",
        "API2:2023 Broken Authentication",
    );
    let run_id = Utc::now().timestamp_millis();

    for (index, password) in WEAK_PASSWORDS.iter().enumerate() {
        let username = format!("weakprobe{run_id}_{}", index + 1);
        let check = format!("register with \"{password}\" ({} chars)", password.len());
        let response = client
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(&json!({ "username": username, "password": password })),
            )
            .await?;

        match response.status {
            StatusCode::CREATED => report.push(
                check,
                Verdict::Vulnerable,
                format!("accepted as {username}"),
            ),
            StatusCode::CONFLICT => report.push(
                check,
                Verdict::Inconclusive,
                format!("{username} already exists"),
            ),
            StatusCode::BAD_REQUEST => {
                report.push(check, Verdict::Secure, format!("rejected: {}", response.describe()));
            }
            _ => report.push(check, Verdict::Inconclusive, response.describe()),
        }
    }

    for (username, password) in WEAK_LOGINS {
        let check = format!("login as {username} with \"{password}\"");
        let response = client
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(&json!({ "username": username, "password": password })),
            )
            .await?;
        if response.is_success() {
            report.push(check, Verdict::Vulnerable, "weak credentials accepted");
        } else {
            report.push(check, Verdict::Secure, response.describe());
        }
    }

    Ok(report)
}
