// ABOUTME: Weighted endpoint catalogue, known accounts and header pools for generated traffic
// ABOUTME: Bodies and query strings are produced per request from small payload templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::Utc;
use insurance_core::models::Role;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Method;
use serde_json::{json, Value};

/// Browser user agents rotated across requests
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Android 14; Mobile; rv:120.0) Gecko/120.0 Firefox/120.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Safari/605.1.15",
];

/// Client addresses sent as `X-Forwarded-For`
pub const IP_ADDRESSES: &[&str] = &[
    "192.168.1.100",
    "192.168.1.101",
    "192.168.1.102",
    "192.168.1.103",
    "192.168.1.104",
    "10.0.0.50",
    "10.0.0.51",
    "10.0.0.52",
    "10.0.0.53",
    "10.0.0.54",
    "172.16.0.10",
    "172.16.0.11",
    "172.16.0.12",
    "172.16.0.13",
    "172.16.0.14",
    "203.0.113.1",
    "203.0.113.2",
    "203.0.113.3",
    "203.0.113.4",
    "203.0.113.5",
];

/// Credentials the simulator logs in with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownAccount {
    /// Login name
    pub username: &'static str,
    /// Plaintext password
    pub password: &'static str,
    /// Role the account is expected to hold
    pub role: Role,
}

impl KnownAccount {
    const fn new(username: &'static str, password: &'static str, role: Role) -> Self {
        Self {
            username,
            password,
            role,
        }
    }

    /// Whether admin-only endpoints are worth calling for this account
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Display for KnownAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.username, self.role)
    }
}

/// Seeded accounts plus three that only exist once someone registers them
pub const KNOWN_ACCOUNTS: &[KnownAccount] = &[
    KnownAccount::new("admin1", "adminpass", Role::Admin),
    KnownAccount::new("admin2", "admin123", Role::Admin),
    KnownAccount::new("user1", "userpass", Role::User),
    KnownAccount::new("user2", "user123", Role::User),
    KnownAccount::new("john.smith", "password123", Role::User),
    KnownAccount::new("sarah.johnson", "sarah2024", Role::User),
    KnownAccount::new("admin.user", "admin@insurance", Role::Admin),
    KnownAccount::new("mike.davis", "mike123", Role::User),
    KnownAccount::new("emily.wilson", "emily2024", Role::User),
    KnownAccount::new("weakuser1", "123", Role::User),
    KnownAccount::new("weakuser2", "123456", Role::User),
    KnownAccount::new("weakuser3", "password", Role::User),
    KnownAccount::new("testuser1", "123", Role::User),
    KnownAccount::new("testuser2", "123456", Role::User),
    KnownAccount::new("testuser3", "password", Role::User),
];

/// HTTP verbs used by the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Verb {
    /// Equivalent request method
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Upper-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Random known username paired with a random known password
    Login,
    /// Fresh `trafficuser<millis>` account
    Register,
    /// Claim estimate for a random policy
    ClaimEstimate,
    /// Random maintenance/debug flags
    SettingsUpdate,
    /// Fixed external document URL
    DocumentPreview,
    /// Fixed support message
    SupportContact,
}

impl Payload {
    /// Build a JSON body from this template
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Value {
        match self {
            Self::Login => {
                let username = KNOWN_ACCOUNTS
                    .choose(rng)
                    .map_or("user1", |account| account.username);
                let password = KNOWN_ACCOUNTS
                    .choose(rng)
                    .map_or("userpass", |account| account.password);
                json!({ "username": username, "password": password })
            }
            Self::Register => json!({
                "username": registration_username(rng),
                "password": "password123"
            }),
            Self::ClaimEstimate => {
                let incident = ["collision", "theft", "vandalism", "weather"]
                    .choose(rng)
                    .copied()
                    .unwrap_or("collision");
                json!({
                    "policyId": format!("POL-{}", rng.gen_range(0..10_000)),
                    "incidentType": incident,
                    "estimatedDamage": rng.gen_range(500..25_500)
                })
            }
            Self::SettingsUpdate => json!({
                "maintenance": rng.gen_bool(0.5),
                "debug": rng.gen_bool(0.5)
            }),
            Self::DocumentPreview => json!({ "url": "https://example.com/document.pdf" }),
            Self::SupportContact => json!({
                "name": "Test User",
                "email": "user@example.com",
                "message": "I need help with my policy"
            }),
        }
    }
}

/// Username for a simulated sign-up
///
/// A random suffix keeps concurrent registrations in the same millisecond apart.
pub fn registration_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "trafficuser{}{:03}",
        Utc::now().timestamp_millis(),
        rng.gen_range(0..1_000)
    )
}

/// Query string templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTemplate {
    /// Empty search with a page size between 10 and 59
    PolicySearch,
}

impl QueryTemplate {
    /// Build query pairs from this template
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<(&'static str, String)> {
        match self {
            Self::PolicySearch => vec![
                ("query", String::new()),
                ("page", "1".to_owned()),
                ("per_page", rng.gen_range(10..60).to_string()),
            ],
        }
    }
}

/// One entry of the traffic mix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Request method
    pub verb: Verb,
    /// Path below the base URL
    pub path: &'static str,
    /// Relative selection weight
    pub weight: u32,
    /// Needs a session token
    pub requires_auth: bool,
    /// Only chosen for admin accounts
    pub admin_only: bool,
    /// Log label
    pub description: &'static str,
    /// Body template, if any
    pub payload: Option<Payload>,
    /// Query template, if any
    pub query: Option<QueryTemplate>,
}

impl Endpoint {
    const fn public(verb: Verb, path: &'static str, weight: u32, description: &'static str) -> Self {
        Self {
            verb,
            path,
            weight,
            requires_auth: false,
            admin_only: false,
            description,
            payload: None,
            query: None,
        }
    }

    const fn authenticated(
        verb: Verb,
        path: &'static str,
        weight: u32,
        description: &'static str,
    ) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(verb, path, weight, description)
        }
    }

    const fn admin(verb: Verb, path: &'static str, weight: u32, description: &'static str) -> Self {
        Self {
            admin_only: true,
            ..Self::authenticated(verb, path, weight, description)
        }
    }

    const fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    const fn with_query(mut self, query: QueryTemplate) -> Self {
        self.query = Some(query);
        self
    }

    /// Login and sign-up are dropped from the mix once an account has a session
    #[must_use]
    pub fn is_credential_endpoint(&self) -> bool {
        self.path == "/api/auth/login" || self.path == "/api/auth/register"
    }
}

/// The full traffic mix
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint::public(Verb::Get, "/", 25, "Service banner"),
    Endpoint::public(Verb::Get, "/api/health", 8, "Health check"),
    Endpoint::public(Verb::Post, "/api/auth/login", 20, "User login").with_payload(Payload::Login),
    Endpoint::public(Verb::Post, "/api/auth/register", 30, "User registration")
        .with_payload(Payload::Register),
    Endpoint::public(Verb::Get, "/api/policies/categories", 12, "Policy categories"),
    Endpoint::authenticated(Verb::Get, "/api/auth/profile", 30, "User profile data"),
    Endpoint::authenticated(Verb::Get, "/api/user/notifications", 25, "User notifications"),
    Endpoint::authenticated(Verb::Post, "/api/claims/estimate", 18, "Submit claim estimate")
        .with_payload(Payload::ClaimEstimate),
    Endpoint::authenticated(Verb::Get, "/api/coverage/details", 20, "Coverage details"),
    Endpoint::admin(Verb::Get, "/api/admin/stats", 5, "Admin statistics"),
    Endpoint::admin(Verb::Get, "/api/admin/settings", 5, "Admin settings"),
    Endpoint::admin(Verb::Put, "/api/admin/settings", 25, "Update admin settings")
        .with_payload(Payload::SettingsUpdate),
    Endpoint::admin(Verb::Get, "/api/admin/reports", 8, "Admin reports"),
    Endpoint::admin(Verb::Delete, "/api/admin/reports", 3, "Clear admin reports"),
    Endpoint::authenticated(Verb::Get, "/api/customers/me", 15, "Customer profile"),
    Endpoint::authenticated(Verb::Get, "/api/accounts/overview", 15, "Account overview"),
    Endpoint::authenticated(Verb::Get, "/api/policies/mine", 25, "User policies"),
    Endpoint::authenticated(Verb::Get, "/api/policies/search", 20, "Search policies")
        .with_query(QueryTemplate::PolicySearch),
    Endpoint::authenticated(Verb::Post, "/api/documents/preview", 8, "Preview document")
        .with_payload(Payload::DocumentPreview),
    Endpoint::authenticated(Verb::Post, "/api/support/contact", 10, "Contact support")
        .with_payload(Payload::SupportContact),
];

/// Pick an endpoint by weight
///
/// With `has_session` set the login and sign-up endpoints are excluded.
pub fn choose_endpoint<R: Rng + ?Sized>(rng: &mut R, has_session: bool) -> Option<&'static Endpoint> {
    let candidates: Vec<&'static Endpoint> = ENDPOINTS
        .iter()
        .filter(|endpoint| !(has_session && endpoint.is_credential_endpoint()))
        .collect();
    candidates
        .choose_weighted(rng, |endpoint| endpoint.weight)
        .ok()
        .copied()
}
