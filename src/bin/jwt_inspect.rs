// ABOUTME: Offline token inspector printing decoded claims and the strict verification outcome
// ABOUTME: Shows issue and expiry times so tampered or stale training tokens can be explained
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Inspect with the default training secret
//! jwt-inspect eyJhbGciOiJIUzI1NiJ9...
//!
//! # Inspect against a custom secret
//! JWT_SECRET=changeme jwt-inspect eyJhbGciOiJIUzI1NiJ9...
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use insurance_api_lab::auth::{AuthManager, TokenInspection};
use insurance_api_lab::logging::LoggingConfig;
use insurance_core::constants::auth::DEFAULT_JWT_SECRET;
use insurance_core::models::Role;

#[derive(Parser)]
#[command(name = "jwt-inspect")]
#[command(about = "Decode a session token and check it against the server secret")]
struct Cli {
    /// Token to inspect, with or without a `Bearer ` prefix
    token: String,

    /// Secret used for verification
    #[arg(long, env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true)]
    secret: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::for_cli("jwt-inspect", "error").init()?;

    let token = cli.token.trim().trim_start_matches("Bearer ").trim();
    let inspection = AuthManager::with_default_lifetime(cli.secret.as_bytes())
        .inspect(token)
        .context("Token payload could not be decoded")?;

    display_inspection(&inspection)
}

fn display_inspection(inspection: &TokenInspection) -> Result<()> {
    println!("Header:");
    println!("{}", serde_json::to_string_pretty(&inspection.header)?);
    println!("\nClaims (unverified):");
    println!("{}", serde_json::to_string_pretty(&inspection.claims)?);

    println!("\n{}", "=".repeat(60));
    match &inspection.verification {
        Ok(()) => println!("Verification: VALID"),
        Err(e) => println!("Verification: FAILED ({e})"),
    }

    let claims = &inspection.claims;
    println!(
        "Issued:      {}",
        claims
            .issued_at()
            .map_or_else(|| "unknown".to_owned(), |at| at.to_rfc3339())
    );
    println!(
        "Expires:     {}",
        claims
            .expires_at()
            .map_or_else(|| "unknown".to_owned(), |at| at.to_rfc3339())
    );
    println!("Expired:     {}", if inspection.is_expired() { "yes" } else { "no" });
    println!("Expires in:  {}", inspection.time_to_expiry_display());
    match Role::from_claim(&claims.role) {
        Some(role) => println!("Role:        {role}"),
        None => println!("Role:        {} (not a known role)", claims.role),
    }
    println!("Admin role:  {}", if claims.is_admin() { "yes" } else { "no" });
    Ok(())
}
