// ABOUTME: Shared server state handed to every route as axum state
// ABOUTME: Holds configuration, token manager, user store, settings overrides and HTTP client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! All long-lived state is created once at startup and shared behind an
//! `Arc<ServerResources>`. Handlers never build their own clients or managers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use insurance_core::errors::AppError;
use reqwest::Client;
use tracing::{debug, warn};

use crate::admin_settings::SettingsStore;
use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::user_store::UserStore;

/// Centralized resource container shared by all handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Token issuance and verification
    pub auth_manager: Arc<AuthManager>,
    /// Flat-file user store
    pub user_store: Arc<UserStore>,
    /// Per-user admin settings overrides
    pub settings: Arc<SettingsStore>,
    /// Outbound client used by the document preview
    pub http_client: Client,
}

impl ServerResources {
    /// Build all shared resources from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be constructed
    pub fn new(config: ServerConfig) -> Result<Self> {
        let auth_manager = AuthManager::new(
            config.auth.jwt_secret.as_bytes(),
            Duration::seconds(config.auth.token_lifetime_secs),
        );
        let user_store = UserStore::new(config.storage.users_file.clone());
        let http_client = Client::builder()
            .timeout(config.preview.timeout)
            .user_agent(concat!("insurance-api-lab/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build preview HTTP client")?;

        debug!(
            users_file = %user_store.path().display(),
            "server resources initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            auth_manager: Arc::new(auth_manager),
            user_store: Arc::new(user_store),
            settings: Arc::new(SettingsStore::new()),
            http_client,
        })
    }

    /// Apply the configured error verbosity to an outgoing error
    #[must_use]
    pub fn surface_error(&self, error: AppError) -> AppError {
        if self.config.errors.verbose {
            return error;
        }
        if let Some(source) = error.source.as_deref() {
            warn!(code = ?error.code, message = %error.message, "redacting error detail: {source}");
        }
        error.redacted()
    }
}
