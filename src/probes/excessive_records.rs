// ABOUTME: Probe requesting policy search pages far larger than the UI ever asks for
// ABOUTME: Page sizes above a sane ceiling are served in full because none is enforced
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde_json::Value;

use super::{ProbeClient, ProbeReport, ProbeResponse, Verdict};

/// Largest page a well-behaved API would return
pub const SANE_PAGE_SIZE: usize = 100;

/// `(query, per_page)` pairs tried in order; the first mimics the UI
const SEARCHES: &[(&str, u64)] = &[("john", 10), ("", 1_000), ("", 1_500), ("john", 500)];

fn returned(response: &ProbeResponse) -> usize {
    response
        .body
        .get("policies")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn total(response: &ProbeResponse) -> u64 {
    response
        .body
        .pointer("/pagination/total")
        .and_then(Value::as_u64)
        .unwrap_or_default()
}

/// Run the page size checks
///
/// # Errors
///
/// Returns an error if the server cannot be reached
pub async fn run(client: &ProbeClient) -> Result<ProbeReport> {
    let mut report = ProbeReport::new(
        "Excessive record retrieval",
        "API4:2023 Unrestricted Resource Consumption",
    );

    for (query, per_page) in SEARCHES {
        let path = format!("/api/policies/search?query={query}&page=1&per_page={per_page}");
        let response = client.get(&path, None).await?;
        let check = format!("search query=\"{query}\" per_page={per_page}");
        if !response.is_success() {
            report.push(check, Verdict::Inconclusive, response.describe());
            continue;
        }

        let count = returned(&response);
        let detail = format!(
            "{count} of {} records, ~{} bytes in {}ms",
            total(&response),
            response.size,
            response.elapsed.as_millis()
        );
        let verdict = if count > SANE_PAGE_SIZE {
            Verdict::Vulnerable
        } else {
            Verdict::Secure
        };
        report.push(check, verdict, detail);
    }

    Ok(report)
}
