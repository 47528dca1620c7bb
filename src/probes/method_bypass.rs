// ABOUTME: Probe comparing GET and DELETE on the admin reports archive for a plain user
// ABOUTME: GET enforces the admin role while DELETE only checks the token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use reqwest::{Method, StatusCode};

use super::{ProbeClient, ProbeReport, Verdict};

const REPORTS_PATH: &str = "/api/admin/reports";

/// Standard user credentials
pub const USER_CREDENTIALS: (&str, &str) = ("user1", "userpass");
/// Admin credentials
pub const ADMIN_CREDENTIALS: (&str, &str) = ("admin1", "adminpass");

/// Run the reports archive checks
///
/// # Errors
///
/// Returns an error if the server cannot be reached or either login fails
pub async fn run(client: &ProbeClient) -> Result<ProbeReport> {
    let mut report = ProbeReport::new(
        "HTTP method bypass",
        "API5:2023 Broken Function Level Authorization",
    );

    let user_token = client
        .login(USER_CREDENTIALS.0, USER_CREDENTIALS.1)
        .await?;

    let get = client.get(REPORTS_PATH, Some(&user_token)).await?;
    let check = "GET /api/admin/reports as user1";
    if get.status == StatusCode::FORBIDDEN {
        report.push(check, Verdict::Secure, get.describe());
    } else if get.is_success() {
        report.push(check, Verdict::Vulnerable, "reports served to a standard user");
    } else {
        report.push(check, Verdict::Inconclusive, get.describe());
    }

    let delete = client
        .send(Method::DELETE, REPORTS_PATH, Some(&user_token), None)
        .await?;
    let check = "DELETE /api/admin/reports as user1";
    if delete.is_success() {
        report.push(
            check,
            Verdict::Vulnerable,
            format!(
                "archive cleared by {} (role {})",
                delete.str_field("clearedBy"),
                delete.str_field("userRole")
            ),
        );
    } else {
        report.push(check, Verdict::Secure, delete.describe());
    }

    let admin_token = client
        .login(ADMIN_CREDENTIALS.0, ADMIN_CREDENTIALS.1)
        .await?;
    let admin_get = client.get(REPORTS_PATH, Some(&admin_token)).await?;
    let check = "GET /api/admin/reports as admin1";
    if admin_get.is_success() {
        report.push(check, Verdict::Secure, "admin access works");
    } else {
        report.push(check, Verdict::Inconclusive, admin_get.describe());
    }

    Ok(report)
}
