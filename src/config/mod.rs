// ABOUTME: Configuration management module for the insurance API server
// ABOUTME: Environment-only settings for network, auth, storage, CORS, errors and previews
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module
//!
//! All server settings come from environment variables, with a few CLI
//! overrides applied by the server binary after loading.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DocumentPreviewConfig, ErrorReportingConfig, HttpConfig, ServerConfig,
    StorageConfig,
};
