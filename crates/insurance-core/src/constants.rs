// ABOUTME: Constants shared by the API server, traffic simulator and probes
// ABOUTME: Grouped by domain: auth, network, policies, documents, service metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Values grouped by the part of the system that owns them.

/// Session token settings
pub mod auth {
    /// Static HS256 secret used when `JWT_SECRET` is unset
    pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-for-security-testing-2024";
    /// Session token lifetime in seconds (15 minutes)
    pub const TOKEN_LIFETIME_SECS: i64 = 900;
    /// Lifetime label echoed in login/registration responses
    pub const TOKEN_LIFETIME_LABEL: &str = "15m";
    /// Authorization scheme prefix
    pub const BEARER_PREFIX: &str = "Bearer";
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 3001;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Default base URL for clients of the API
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
    /// Origins allowed without a warning when `CORS_ORIGINS` is unset
    pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];
}

/// Policy data
pub mod policies {
    /// Size of the generated search dataset
    pub const SEARCH_DATASET_SIZE: u32 = 10_000;
    /// Default search page
    pub const DEFAULT_PAGE: u64 = 1;
    /// Default search page size
    pub const DEFAULT_PER_PAGE: u64 = 10;
    /// Policy categories offered by the portal
    pub const CATEGORIES: &[&str] = &[
        "Auto",
        "Home",
        "Health",
        "Travel",
        "Pet",
        "Life",
        "Business",
        "Motorcycle",
        "Boat",
        "RV",
    ];
}

/// Document preview
pub mod documents {
    /// URL fetched when the request body names none
    pub const DEFAULT_PREVIEW_URL: &str = "http://example.com/report-preview";
    /// Default live-fetch timeout in seconds
    pub const DEFAULT_PREVIEW_TIMEOUT_SECS: u64 = 10;
}

/// Service metadata
pub mod service {
    /// Service name used in banners and logs
    pub const SERVICE_NAME: &str = "insurance-api";
    /// API version reported by discovery and health endpoints
    pub const API_VERSION: &str = "1.0.0";
}
