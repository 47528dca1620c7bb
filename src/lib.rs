// ABOUTME: Main library entry point for the insurance API security lab
// ABOUTME: Exposes the vulnerable REST API, the traffic simulator and the vulnerability probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Insurance API Lab
//!
//! A deliberately vulnerable insurance-portal REST API for practising the
//! OWASP API Security Top-10, together with the tools used to exercise it.
//!
//! ## Components
//!
//! - **API** (`insurance-api-server`): axum router over a flat-file user
//!   store, with per-route token handling ranging from correct to absent
//! - **Traffic simulator** (`traffic-simulator`): weighted random traffic
//!   from a pool of known accounts
//! - **Probes** (`api-probe`): one-shot checks for each weakness class
//! - **Token inspection** (`jwt-inspect`): offline decode and verification
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use insurance_api_lab::config::ServerConfig;
//! use insurance_api_lab::server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     server::run(config).await
//! }
//! ```

/// Per-user admin settings overrides
pub mod admin_settings;

/// Session token issuance and verification
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// Extractors, CORS, request IDs and tracing
pub mod middleware;

/// Generated records served by the portal
pub mod mock_data;

/// One-shot vulnerability probes
pub mod probes;

/// Shared server state
pub mod resources;

/// HTTP route handlers by domain
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Weighted traffic generator
pub mod simulator;

/// Flat-file user persistence
pub mod user_store;

pub use insurance_core::{constants, errors, models, pagination};
