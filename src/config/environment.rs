// ABOUTME: Environment-based server configuration with typed sections and defaults
// ABOUTME: Reads PORT, HOST, JWT_SECRET, CORS_ORIGINS, USERS_FILE, VERBOSE_ERRORS and preview settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! Unset variables fall back to the defaults of the training deployment,
//! including the well-known static JWT secret.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use insurance_core::constants::{auth, documents, network};
use tracing::{info, warn};

/// Default location of the user file
const DEFAULT_USERS_FILE: &str = "data/users.json";

/// Listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl HttpConfig {
    /// Socket address to bind
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` does not parse as a socket address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

/// Token signing settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 secret
    pub jwt_secret: String,
    /// Session lifetime in seconds
    pub token_lifetime_secs: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .finish()
    }
}

impl AuthConfig {
    /// Whether the well-known default secret is in use
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == auth::DEFAULT_JWT_SECRET
    }
}

/// Browser origin settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins expected to call the API; others are logged but still allowed
    pub allowed_origins: Vec<String>,
}

/// Flat-file storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the JSON user file
    pub users_file: PathBuf,
}

/// Error body settings
#[derive(Debug, Clone, Copy)]
pub struct ErrorReportingConfig {
    /// Include internal error chains in 500 responses
    pub verbose: bool,
}

/// Document preview settings
#[derive(Debug, Clone, Copy)]
pub struct DocumentPreviewConfig {
    /// Actually fetch the requested URL instead of returning canned content
    pub live_fetch: bool,
    /// Fetch timeout
    pub timeout: Duration,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener
    pub http: HttpConfig,
    /// Token signing
    pub auth: AuthConfig,
    /// CORS
    pub cors: CorsConfig,
    /// User file
    pub storage: StorageConfig,
    /// Error bodies
    pub errors: ErrorReportingConfig,
    /// Document preview
    pub preview: DocumentPreviewConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                host: network::DEFAULT_HOST.to_owned(),
                port: network::DEFAULT_HTTP_PORT,
            },
            auth: AuthConfig {
                jwt_secret: auth::DEFAULT_JWT_SECRET.to_owned(),
                token_lifetime_secs: auth::TOKEN_LIFETIME_SECS,
            },
            cors: CorsConfig {
                allowed_origins: network::DEFAULT_CORS_ORIGINS
                    .iter()
                    .map(|origin| (*origin).to_owned())
                    .collect(),
            },
            storage: StorageConfig {
                users_file: PathBuf::from(DEFAULT_USERS_FILE),
            },
            errors: ErrorReportingConfig { verbose: true },
            preview: DocumentPreviewConfig {
                live_fetch: false,
                timeout: Duration::from_secs(documents::DEFAULT_PREVIEW_TIMEOUT_SECS),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port, or if
    /// `JWT_SECRET` is set to an empty string
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            Err(_) => defaults.http.port,
        };

        let jwt_secret = env_var_or("JWT_SECRET", auth::DEFAULT_JWT_SECRET);
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let allowed_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors.allowed_origins);

        let config = Self {
            http: HttpConfig {
                host: env_var_or("HOST", network::DEFAULT_HOST),
                port,
            },
            auth: AuthConfig {
                jwt_secret,
                token_lifetime_secs: defaults.auth.token_lifetime_secs,
            },
            cors: CorsConfig { allowed_origins },
            storage: StorageConfig {
                users_file: PathBuf::from(env_var_or("USERS_FILE", DEFAULT_USERS_FILE)),
            },
            errors: ErrorReportingConfig {
                verbose: parse_bool(&env_var_or("VERBOSE_ERRORS", "true")).unwrap_or(true),
            },
            preview: DocumentPreviewConfig {
                live_fetch: parse_bool(&env_var_or("DOCUMENT_PREVIEW_LIVE_FETCH", "false"))
                    .unwrap_or(false),
                timeout: Duration::from_secs(
                    env::var("DOCUMENT_PREVIEW_TIMEOUT_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(documents::DEFAULT_PREVIEW_TIMEOUT_SECS),
                ),
            },
        };

        if config.auth.uses_default_secret() {
            warn!("JWT_SECRET not set: signing tokens with the published default secret");
        }

        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Insurance API Server Configuration:\n\
             - Bind: {}:{}\n\
             - Users File: {}\n\
             - JWT Secret: {}\n\
             - Token Lifetime: {}s\n\
             - CORS Origins: {}\n\
             - Verbose Errors: {}\n\
             - Document Preview: {} (timeout {}s)",
            self.http.host,
            self.http.port,
            self.storage.users_file.display(),
            if self.auth.uses_default_secret() {
                "default"
            } else {
                "custom"
            },
            self.auth.token_lifetime_secs,
            self.cors.allowed_origins.join(", "),
            if self.errors.verbose {
                "Enabled"
            } else {
                "Disabled"
            },
            if self.preview.live_fetch {
                "Live fetch"
            } else {
                "Mock content"
            },
            self.preview.timeout.as_secs(),
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated origins
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse the usual truthy/falsy spellings
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_empty() {
        assert_eq!(
            parse_origins(" http://a.test/ ,,http://b.test"),
            vec!["http://a.test".to_owned(), "http://b.test".to_owned()]
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http.port, 3001);
        assert!(config.errors.verbose);
        assert!(!config.preview.live_fetch);
        assert!(config.auth.uses_default_secret());
        assert!(config.http.bind_addr().is_ok());
    }
}
