// ABOUTME: Traffic simulator binary sending realistic mixed traffic at a running insurance API
// ABOUTME: Prints run statistics when the run finishes or on Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Five minutes against a local server
//! traffic-simulator
//!
//! # One short round with three users
//! traffic-simulator --base-url http://localhost:3001 --concurrent-users 3 --rounds 1
//! ```

use std::future;

use anyhow::Result;
use clap::Parser;
use insurance_api_lab::logging::LoggingConfig;
use insurance_api_lab::simulator::{SimulatorConfig, TrafficSimulator};
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "traffic-simulator")]
#[command(about = "Generate realistic API traffic against the insurance API")]
struct Cli {
    #[command(flatten)]
    config: SimulatorConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli("traffic-simulator", "info").init()?;

    let simulator = TrafficSimulator::new(cli.config)?;
    println!("Starting API traffic simulation");
    println!("Target: {}", simulator.config().base_url());
    println!("Duration: {} minutes", simulator.config().duration_minutes);
    println!("Concurrent Users: {}", simulator.config().concurrent_users);
    println!("Request Interval: {}ms", simulator.config().request_interval_ms);
    println!("=====================================\n");

    let interrupted = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {e}");
            future::pending::<()>().await;
        }
    };

    tokio::select! {
        rounds = simulator.run() => {
            info!(rounds, "Simulation finished");
        }
        () = interrupted => {
            println!("\nReceived Ctrl-C, printing final stats...");
        }
    }

    println!("\n{}", simulator.summary().await);
    println!("Traffic simulation completed");
    Ok(())
}
