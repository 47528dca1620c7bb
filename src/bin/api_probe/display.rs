// ABOUTME: Output helpers for api-probe
// ABOUTME: Prints per-probe reports and the closing summary table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Error;
use insurance_api_lab::probes::{Probe, ProbeReport, Verdict};

/// Print one probe report with a blank line after it
pub fn display_report(report: &ProbeReport) {
    println!("{}", report.render());
}

/// Print a probe that could not complete
pub fn display_failure(probe: Probe, error: &Error) {
    println!("{probe}");
    println!("{}", "=".repeat(60));
    println!("[ERROR] probe aborted: {error:#}\n");
}

/// Print the one-line-per-probe summary after `all`
pub fn display_summary(results: &[(Probe, Option<ProbeReport>)]) {
    println!("Summary");
    println!("{}", "=".repeat(60));
    for (probe, report) in results {
        let status = report.as_ref().map_or("ERROR", |report| {
            if report.is_vulnerable() {
                Verdict::Vulnerable.label()
            } else {
                "NOT VULNERABLE"
            }
        });
        let counts = report.as_ref().map_or_else(String::new, |report| {
            format!(
                "{} vulnerable, {} ok, {} inconclusive",
                report.count(Verdict::Vulnerable),
                report.count(Verdict::Secure),
                report.count(Verdict::Inconclusive)
            )
        });
        println!("{:<20} {status:<15} {counts}", probe.name());
    }
}
