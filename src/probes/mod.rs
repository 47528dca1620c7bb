// ABOUTME: One-shot HTTP probes that confirm each deliberate weakness of a running insurance API
// ABOUTME: Shared probe client, findings model and report rendering used by the api-probe binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Vulnerability Probes
//!
//! Each probe talks to a live server over HTTP and records one [`Finding`]
//! per check. A finding is `Vulnerable` when the server behaved the way the
//! weakness predicts, `Secure` when it refused, and `Inconclusive` when the
//! response fits neither.

/// Unbounded page size checks
pub mod excessive_records;
/// GET versus DELETE role checks on the reports archive
pub mod method_bypass;
/// Expected behaviour of the correctly protected endpoints
pub mod secure_endpoints;
/// Forged, expired and re-signed tokens plus unauthenticated PII
pub mod token_tampering;
/// Registration and login with trivial passwords
pub mod weak_passwords;

use std::fmt::{self, Write as _};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use insurance_core::models::Claims;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::AuthManager;

/// How a check came out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The weakness was reproduced
    Vulnerable,
    /// The server refused as it should
    Secure,
    /// Neither outcome could be established
    Inconclusive,
}

impl Verdict {
    /// Report label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vulnerable => "VULNERABLE",
            Self::Secure => "OK",
            Self::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// What was tried
    pub check: String,
    /// Outcome
    pub verdict: Verdict,
    /// Observed response
    pub detail: String,
}

/// All findings of one probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Probe title
    pub title: &'static str,
    /// OWASP API Top-10 category
    pub category: &'static str,
    /// Findings in the order checks ran
    pub findings: Vec<Finding>,
}

impl ProbeReport {
    /// Create an empty report
    #[must_use]
    pub const fn new(title: &'static str, category: &'static str) -> Self {
        Self {
            title,
            category,
            findings: Vec::new(),
        }
    }

    /// Record a finding
    pub fn push(&mut self, check: impl Into<String>, verdict: Verdict, detail: impl Into<String>) {
        self.findings.push(Finding {
            check: check.into(),
            verdict,
            detail: detail.into(),
        });
    }

    /// Number of findings with `verdict`
    #[must_use]
    pub fn count(&self, verdict: Verdict) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.verdict == verdict)
            .count()
    }

    /// Whether any check reproduced a weakness
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        self.count(Verdict::Vulnerable) > 0
    }

    /// Finding for the check named `check`
    #[must_use]
    pub fn finding(&self, check: &str) -> Option<&Finding> {
        self.findings.iter().find(|finding| finding.check == check)
    }

    /// Plain-text report
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.title, self.category);
        let _ = writeln!(out, "{}", "=".repeat(60));
        for finding in &self.findings {
            let _ = writeln!(out, "[{}] {}", finding.verdict, finding.check);
            if !finding.detail.is_empty() {
                let _ = writeln!(out, "    {}", finding.detail);
            }
        }
        let vulnerable = self.count(Verdict::Vulnerable);
        let _ = writeln!(
            out,
            "Result: {} ({vulnerable} of {} checks reproduced a weakness)",
            if vulnerable > 0 {
                "VULNERABLE"
            } else {
                "NOT VULNERABLE"
            },
            self.findings.len()
        );
        out
    }
}

/// A response reduced to what the probes look at
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body was not JSON
    pub body: Value,
    /// Body size in bytes
    pub size: usize,
    /// Round-trip time
    pub elapsed: Duration,
}

impl ProbeResponse {
    /// 2xx status
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// String field of the body, or an empty string
    #[must_use]
    pub fn str_field(&self, key: &str) -> &str {
        self.body.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    /// `status code + error code` for finding details
    #[must_use]
    pub fn describe(&self) -> String {
        match self.body.get("code").and_then(Value::as_str) {
            Some(code) => format!("{} {code}: {}", self.status.as_u16(), self.str_field("message")),
            None => format!("{}", self.status.as_u16()),
        }
    }
}

/// HTTP client bound to one API base URL
#[derive(Clone)]
pub struct ProbeClient {
    base_url: String,
    http: Client,
    signer: AuthManager,
}

impl ProbeClient {
    /// Create a client for `base_url`; `jwt_secret` is used to forge tokens
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: &str, jwt_secret: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
            signer: AuthManager::with_default_lifetime(jwt_secret.as_bytes()),
        })
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and collect the response
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ProbeResponse> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {method} {url}"))?;
        let elapsed = started.elapsed();
        debug!(%method, %url, status = status.as_u16(), bytes = bytes.len(), "probe request");

        Ok(ProbeResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            size: bytes.len(),
            elapsed,
        })
    }

    /// GET `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ProbeResponse> {
        self.send(Method::GET, path, token, None).await
    }

    /// Log in and return the issued token
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the login is refused
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(&json!({ "username": username, "password": password })),
            )
            .await?;
        if !response.is_success() {
            bail!("Login as {username} refused: {}", response.describe());
        }
        let token = response.str_field("token");
        if token.is_empty() {
            bail!("Login as {username} returned no token");
        }
        Ok(token.to_owned())
    }

    /// Sign `claims` with the configured secret
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn forge(&self, claims: &Claims) -> Result<String> {
        self.signer
            .sign_claims(claims)
            .context("Failed to sign forged claims")
    }
}

/// The available probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Trivial passwords at registration and login
    WeakPasswords,
    /// DELETE on the reports archive without the admin role
    MethodBypass,
    /// Page sizes far beyond a sane limit
    ExcessiveRecords,
    /// Forged, expired and re-signed tokens
    TokenTampering,
    /// Endpoints that should enforce authentication and validation
    SecureEndpoints,
}

impl Probe {
    /// Every probe, in the order `all` runs them
    pub const ALL: [Self; 5] = [
        Self::WeakPasswords,
        Self::MethodBypass,
        Self::ExcessiveRecords,
        Self::TokenTampering,
        Self::SecureEndpoints,
    ];

    /// Command-line name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WeakPasswords => "weak-passwords",
            Self::MethodBypass => "method-bypass",
            Self::ExcessiveRecords => "excessive-records",
            Self::TokenTampering => "token-tampering",
            Self::SecureEndpoints => "secure-endpoints",
        }
    }

    /// Run this probe against `client`
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or a prerequisite
    /// login fails
    pub async fn run(self, client: &ProbeClient) -> Result<ProbeReport> {
        match self {
            Self::WeakPasswords => weak_passwords::run(client).await,
            Self::MethodBypass => method_bypass::run(client).await,
            Self::ExcessiveRecords => excessive_records::run(client).await,
            Self::TokenTampering => token_tampering::run(client).await,
            Self::SecureEndpoints => secure_endpoints::run(client).await,
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_verdicts() {
        let mut report = ProbeReport::new("Example", "API0:2023");
        report.push("first", Verdict::Secure, "403");
        assert!(!report.is_vulnerable());

        report.push("second", Verdict::Vulnerable, "200");
        report.push("third", Verdict::Inconclusive, "");
        assert!(report.is_vulnerable());
        assert_eq!(report.count(Verdict::Vulnerable), 1);
        assert_eq!(report.finding("second").unwrap().detail, "200");

        let text = report.render();
        assert!(text.contains("[VULNERABLE] second"));
        assert!(text.contains("1 of 3 checks"));
    }

    #[test]
    fn test_describe_includes_error_code() {
        let response = ProbeResponse {
            status: StatusCode::FORBIDDEN,
            body: json!({"code": "ADMIN_ACCESS_REQUIRED", "message": "Admin role required"}),
            size: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(
            response.describe(),
            "403 ADMIN_ACCESS_REQUIRED: Admin role required"
        );
    }
}
