// ABOUTME: Insurance API server binary for the OWASP API Top-10 training lab
// ABOUTME: Loads environment configuration, applies CLI overrides and serves until Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Insurance API Server Binary
//!
//! Starts the deliberately vulnerable insurance portal API. Never expose it
//! outside an isolated training network.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use insurance_api_lab::{config::ServerConfig, logging, server};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "insurance-api-server")]
#[command(about = "Deliberately vulnerable insurance portal API for security training")]
pub struct Args {
    /// Override listen port (`PORT`)
    #[arg(long)]
    port: Option<u16>,

    /// Override bind address (`HOST`)
    #[arg(long)]
    host: Option<String>,

    /// Override the user file location (`USERS_FILE`)
    #[arg(long)]
    users_file: Option<PathBuf>,
}

#[tokio::main]
#[allow(clippy::cognitive_complexity)]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(users_file) = args.users_file {
        config.storage.users_file = users_file;
    }

    info!("Starting Insurance API Backend");
    info!("{}", config.summary());
    warn!("This server is intentionally vulnerable; run it on an isolated network only");
    display_available_endpoints(&config);

    if let Err(e) = server::run(config).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Log the main entry points
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.http.host, config.http.port);
    info!("=== Available API Endpoints ===");
    info!("   Health Check:      GET  {base}/api/health");
    info!("   API Discovery:     GET  {base}/api/");
    info!("   User Registration: POST {base}/api/auth/register");
    info!("   User Login:        POST {base}/api/auth/login");
    info!("   Policy Search:     GET  {base}/api/policies/search");
    info!("   Admin Settings:    GET  {base}/api/admin/settings");
    info!("=== End of Endpoint List ===");
}
