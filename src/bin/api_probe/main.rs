// ABOUTME: api-probe - one-shot checks confirming each weakness of a running insurance API
// ABOUTME: Runs a single probe or all of them and prints a vulnerable/ok report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Everything against a local server
//! api-probe all
//!
//! # Only the BFLA check against another host
//! api-probe --base-url http://10.0.0.5:3001 method-bypass
//!
//! # Forge tokens with a non-default secret
//! JWT_SECRET=changeme api-probe token-tampering
//! ```

mod display;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use insurance_api_lab::logging::LoggingConfig;
use insurance_api_lab::probes::{Probe, ProbeClient};
use insurance_core::constants::auth::DEFAULT_JWT_SECRET;
use insurance_core::constants::network::DEFAULT_BASE_URL;
use tracing::info;

use display::{display_failure, display_report, display_summary};

#[derive(Parser)]
#[command(
    name = "api-probe",
    about = "Vulnerability probes for the insurance API",
    long_about = "Sends crafted requests to a running insurance API and reports which deliberate weaknesses are reproducible."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL
    #[arg(long, env = "PROBE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Secret used to re-sign tampered tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true, global = true)]
    jwt_secret: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout_secs: u64,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Register and log in with trivial passwords
    WeakPasswords,
    /// DELETE the reports archive as a regular user
    MethodBypass,
    /// Request oversized policy search pages
    ExcessiveRecords,
    /// Forged, expired and role-tampered tokens plus unauthenticated PII
    TokenTampering,
    /// Control checks on correctly protected endpoints
    SecureEndpoints,
    /// Run every probe and print a summary
    All,
}

impl Command {
    const fn probe(&self) -> Option<Probe> {
        match self {
            Self::WeakPasswords => Some(Probe::WeakPasswords),
            Self::MethodBypass => Some(Probe::MethodBypass),
            Self::ExcessiveRecords => Some(Probe::ExcessiveRecords),
            Self::TokenTampering => Some(Probe::TokenTampering),
            Self::SecureEndpoints => Some(Probe::SecureEndpoints),
            Self::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::for_cli("api-probe", "warn").init()?;

    let client = ProbeClient::new(
        &cli.base_url,
        &cli.jwt_secret,
        Duration::from_secs(cli.timeout_secs),
    )?;
    println!("Target: {}\n", client.base_url());

    if let Some(probe) = cli.command.probe() {
        let report = probe.run(&client).await?;
        display_report(&report);
        return Ok(());
    }

    let mut results = Vec::with_capacity(Probe::ALL.len());
    for probe in Probe::ALL {
        info!(%probe, "running probe");
        match probe.run(&client).await {
            Ok(report) => {
                display_report(&report);
                results.push((probe, Some(report)));
            }
            Err(e) => {
                display_failure(probe, &e);
                results.push((probe, None));
            }
        }
    }
    display_summary(&results);
    Ok(())
}
