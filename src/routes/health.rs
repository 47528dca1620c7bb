// ABOUTME: Service banner, API discovery document and health check handlers
// ABOUTME: Public endpoints used by monitoring and by API discovery tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Banner, discovery and health routes

use axum::{routing::get, Json, Router};
use chrono::Utc;
use insurance_core::constants::service::API_VERSION;
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the banner, discovery and health routes
    pub fn routes() -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route("/api", get(Self::handle_discovery))
            .route("/api/", get(Self::handle_discovery))
            .route("/api/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "message": "Insurance API Backend is running",
            "timestamp": Utc::now().to_rfc3339(),
            "version": API_VERSION
        }))
    }

    async fn handle_root() -> Json<Value> {
        Json(json!({
            "message": "Insurance API Backend",
            "endpoints": {
                "health": "GET /api/health",
                "login": "POST /api/auth/login",
                "profile": "GET /api/auth/profile",
                "users": "GET /api/auth/users (admin only)",
                "vulnerable": {
                    "customers": "GET /api/customers/me (JWT bypass)",
                    "accounts": "GET /api/accounts/overview (expired token)",
                    "policies": "GET /api/policies/:id (no auth)"
                }
            },
            "documentation": "This is a backend API for security testing purposes"
        }))
    }

    async fn handle_discovery() -> Json<Value> {
        Json(json!({
            "message": "Insurance API Backend - API Discovery",
            "version": API_VERSION,
            "timestamp": Utc::now().to_rfc3339(),
            "endpoints": {
                "health": endpoint("GET", "/api/health", "Health check endpoint", false),
                "auth": {
                    "login": endpoint("POST", "/api/auth/login", "User authentication", false),
                    "register": endpoint("POST", "/api/register", "User registration", false),
                    "profile": endpoint("GET", "/api/auth/profile", "Get user profile", true),
                    "users": admin_endpoint("GET", "/api/auth/users", "List all users (admin only)")
                },
                "policies": {
                    "categories": endpoint("GET", "/api/policies/categories", "Get policy categories", false),
                    "search": endpoint("GET", "/api/policies/search", "Search policies", false),
                    "mine": endpoint("GET", "/api/policies/mine", "Get my policy", false),
                    "details": endpoint("GET", "/api/policies/:id", "Get policy details", false)
                },
                "accounts": {
                    "overview": endpoint("GET", "/api/accounts/overview", "Get account overview", true)
                },
                "customers": {
                    "profile": endpoint("GET", "/api/customers/me", "Get customer profile", true)
                },
                "documents": {
                    "preview": endpoint("POST", "/api/documents/preview", "Preview document", false)
                },
                "support": {
                    "contact": endpoint("POST", "/api/support/contact", "Submit a support request", false)
                },
                "member": {
                    "notifications": endpoint("GET", "/api/user/notifications", "User notifications", true),
                    "claimEstimate": endpoint("POST", "/api/claims/estimate", "Submit a claim estimate", true),
                    "coverage": endpoint("GET", "/api/coverage/details", "Active coverage summary", true)
                },
                "admin": {
                    "stats": admin_endpoint("GET", "/api/admin/stats", "Get admin statistics"),
                    "settings": admin_endpoint("GET", "/api/admin/settings", "Get admin settings"),
                    "reports": admin_endpoint("GET", "/api/admin/reports", "Get admin reports")
                }
            },
            "documentation": "This is a backend API for security testing purposes with both secure and vulnerable endpoints"
        }))
    }
}

fn endpoint(method: &str, path: &str, description: &str, auth: bool) -> Value {
    json!({
        "method": method,
        "path": path,
        "description": description,
        "auth": auth
    })
}

fn admin_endpoint(method: &str, path: &str, description: &str) -> Value {
    let mut entry = endpoint(method, path, description, true);
    entry["admin"] = Value::Bool(true);
    entry
}
