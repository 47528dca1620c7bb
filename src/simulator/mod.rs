// ABOUTME: Traffic simulator driving realistic mixed traffic at a running insurance API
// ABOUTME: Rounds of concurrent account sessions with weighted endpoint choice and token refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Traffic Simulator
//!
//! Each round picks `concurrent_users` known accounts at random and drives
//! them in parallel: one login, then between one and `max_requests_per_user`
//! weighted requests with a random pause before each. Every round also sends
//! one anonymous registration. Rounds repeat until the configured duration
//! has elapsed, with a pause of one to two intervals between them.
//!
//! Tokens are cached per username. A cached token past its `exp` is dropped
//! and the account logs in again before use; a 401 on an authenticated
//! endpoint triggers one re-login and one retry.

/// Simulator settings
pub mod config;
/// Endpoint catalogue, accounts and header pools
pub mod endpoints;
/// Per-username token cache
pub mod session;
/// Run statistics
pub mod stats;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub use config::SimulatorConfig;
pub use endpoints::{choose_endpoint, Endpoint, KnownAccount, ENDPOINTS, KNOWN_ACCOUNTS};
pub use session::{Lookup, Session, SessionCache};
pub use stats::{EndpointCounts, RequestRecord, SimulationStats};

use endpoints::{registration_username, IP_ADDRESSES, USER_AGENTS};

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: Option<LoginUser>,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    role: String,
}

/// Client identity headers for one request
#[derive(Debug, Clone, Copy)]
struct Identity {
    user_agent: &'static str,
    ip_address: &'static str,
}

impl Identity {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            user_agent: USER_AGENTS.choose(rng).copied().unwrap_or_default(),
            ip_address: IP_ADDRESSES.choose(rng).copied().unwrap_or_default(),
        }
    }
}

/// Outcome of sending one request
#[derive(Debug)]
struct Attempt {
    identity: Identity,
    status: Option<StatusCode>,
    /// Whether the whole response body arrived
    body_read: bool,
}

impl Attempt {
    fn succeeded(&self) -> bool {
        self.body_read && self.status.is_some_and(|status| status.is_success())
    }

    fn status_label(&self) -> String {
        match self.status {
            None => "NETWORK_ERROR".to_owned(),
            Some(status) if !self.body_read => format!("{} BODY_READ_ERROR", status.as_u16()),
            Some(status) => status.as_u16().to_string(),
        }
    }
}

/// Drives simulated traffic and collects statistics
pub struct TrafficSimulator {
    config: SimulatorConfig,
    client: Client,
    sessions: SessionCache,
    stats: Mutex<SimulationStats>,
    started: Instant,
}

impl TrafficSimulator {
    /// Create a simulator; the run clock starts now
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            client,
            sessions: SessionCache::new(),
            stats: Mutex::new(SimulationStats::new()),
            started: Instant::now(),
        })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Time since the simulator was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Copy of the statistics so far
    pub async fn snapshot(&self) -> SimulationStats {
        self.stats.lock().await.clone()
    }

    /// Rendered statistics so far
    pub async fn summary(&self) -> String {
        self.snapshot().await.render_summary(self.elapsed())
    }

    /// Run rounds until the duration elapses or the round limit is reached
    ///
    /// Returns the number of rounds completed.
    pub async fn run(&self) -> u64 {
        let deadline = self.started + self.config.duration();
        let accounts = self.select_accounts();
        info!(
            "Starting traffic simulation: {}",
            self.config.summary()
        );
        info!(
            "Selected users: {}",
            accounts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut rounds = 0;
        while Instant::now() < deadline {
            let users = join_all(accounts.iter().map(|account| self.simulate_account(*account)));
            tokio::join!(users, self.register_new_user());
            rounds += 1;

            if self.config.max_rounds.is_some_and(|limit| rounds >= limit) {
                break;
            }

            let pause = StdRng::from_entropy().gen_range(self.config.round_pause_ms());
            info!(round = rounds, "Waiting {pause}ms before next round");
            sleep(Duration::from_millis(pause)).await;
        }

        info!(rounds, "Traffic simulation completed");
        rounds
    }

    fn select_accounts(&self) -> Vec<KnownAccount> {
        let mut rng = StdRng::from_entropy();
        KNOWN_ACCOUNTS
            .choose_multiple(&mut rng, self.config.concurrent_users)
            .copied()
            .collect()
    }

    async fn simulate_account(&self, account: KnownAccount) {
        let mut rng = StdRng::from_entropy();
        let request_count = rng.gen_range(1..=self.config.max_requests_per_user);
        info!(
            username = account.username,
            role = %account.role,
            requests = request_count,
            "Starting user simulation"
        );

        self.stats.lock().await.login_attempts += 1;
        self.login(&account, &mut rng).await;

        for _ in 0..request_count {
            let delay = rng.gen_range(self.config.request_delay_ms());
            sleep(Duration::from_millis(delay)).await;
            self.make_request(&account, &mut rng).await;
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Log `account` in and cache its session; returns the token
    async fn login(&self, account: &KnownAccount, rng: &mut StdRng) -> Option<String> {
        let identity = Identity::random(rng);
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .header(USER_AGENT, identity.user_agent)
            .header("X-Forwarded-For", identity.ip_address)
            .json(&json!({ "username": account.username, "password": account.password }))
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(
                    username = account.username,
                    status = response.status().as_u16(),
                    "Login failed"
                );
                return None;
            }
            Err(e) => {
                warn!(username = account.username, "Login failed: NETWORK_ERROR ({e})");
                return None;
            }
        };

        match response.json::<LoginResponse>().await {
            Ok(body) => {
                let role = body
                    .user
                    .map_or_else(|| account.role.to_string(), |user| user.role);
                info!(username = account.username, role = %role, "Login successful");
                self.sessions
                    .insert(account.username, Session::from_token(body.token.clone(), role))
                    .await;
                self.stats.lock().await.record_login(account.username);
                Some(body.token)
            }
            Err(e) => {
                warn!(username = account.username, "Login response had no token: {e}");
                None
            }
        }
    }

    /// Drop the cached session for `username`
    async fn drop_session(&self, username: &str) {
        self.sessions.remove(username).await;
        self.stats.lock().await.forget_user(username);
    }

    /// Token for an authenticated request, logging in again if the cached one expired
    async fn current_token(&self, account: &KnownAccount, rng: &mut StdRng) -> Option<String> {
        match self.sessions.lookup(account.username).await {
            Lookup::Valid(session) => Some(session.token),
            Lookup::Expired => {
                info!(
                    username = account.username,
                    "Token expired, clearing session and logging in again"
                );
                self.stats.lock().await.forget_user(account.username);
                self.login(account, rng).await
            }
            Lookup::Missing => None,
        }
    }

    async fn make_request(&self, account: &KnownAccount, rng: &mut StdRng) {
        let has_session = self.sessions.contains(account.username).await;
        let Some(endpoint) = choose_endpoint(rng, has_session) else {
            return;
        };

        if endpoint.admin_only && !account.is_admin() {
            debug!(
                username = account.username,
                path = endpoint.path,
                "Skipping admin-only endpoint"
            );
            return;
        }

        let token = if endpoint.requires_auth {
            let Some(token) = self.current_token(account, rng).await else {
                debug!(
                    username = account.username,
                    path = endpoint.path,
                    "Skipping authenticated endpoint without a session"
                );
                return;
            };
            Some(token)
        } else {
            None
        };

        self.stats.lock().await.record_sent(token.is_some());
        let started = Instant::now();
        let attempt = self.send(endpoint, token.as_deref(), rng).await;

        if endpoint.requires_auth && attempt.status == Some(StatusCode::UNAUTHORIZED) {
            warn!(
                username = account.username,
                path = endpoint.path,
                "401 received, clearing session and logging in again"
            );
            self.drop_session(account.username).await;
            if let Some(token) = self.login(account, rng).await {
                let retry = self.send(endpoint, Some(&token), rng).await;
                self.finish(endpoint, account.username, &retry, started.elapsed(), true)
                    .await;
                return;
            }
        }

        self.finish(endpoint, account.username, &attempt, started.elapsed(), false)
            .await;
    }

    async fn send(&self, endpoint: &Endpoint, token: Option<&str>, rng: &mut StdRng) -> Attempt {
        let identity = Identity::random(rng);
        let mut request = self
            .client
            .request(endpoint.verb.method(), self.url(endpoint.path))
            .header(USER_AGENT, identity.user_agent)
            .header("X-Forwarded-For", identity.ip_address)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(query) = endpoint.query {
            request = request.query(&query.generate(rng));
        }
        if let Some(payload) = endpoint.payload {
            request = request.json(&payload.generate(rng));
        }

        let (status, body_read) = match request.send().await {
            Ok(response) => {
                let status = response.status();
                // Drain the body so the timing covers the whole response
                match response.bytes().await {
                    Ok(_) => (Some(status), true),
                    Err(e) => {
                        debug!(path = endpoint.path, "Response body error: {e}");
                        (Some(status), false)
                    }
                }
            }
            Err(e) => {
                debug!(path = endpoint.path, "Request error: {e}");
                (None, false)
            }
        };

        Attempt {
            identity,
            status,
            body_read,
        }
    }

    async fn finish(
        &self,
        endpoint: &Endpoint,
        username: &str,
        attempt: &Attempt,
        elapsed: Duration,
        retried: bool,
    ) {
        self.stats.lock().await.record(&RequestRecord {
            path: endpoint.path,
            user_agent: attempt.identity.user_agent,
            ip_address: attempt.identity.ip_address,
            elapsed,
            success: attempt.succeeded(),
        });

        let elapsed_ms = elapsed.as_millis();
        let status = attempt.status_label();
        let suffix = if retried { " [RETRY]" } else { "" };
        if attempt.succeeded() {
            info!(
                "{} {} - {status} ({elapsed_ms}ms) - {username} - {}{suffix}",
                endpoint.verb, endpoint.path, endpoint.description
            );
        } else {
            warn!(
                "{} {} - {status} ({elapsed_ms}ms) - {username} - {}{suffix}",
                endpoint.verb, endpoint.path, endpoint.description
            );
        }
    }

    /// Anonymous sign-up sent once per round
    async fn register_new_user(&self) {
        let (identity, username) = {
            let mut rng = StdRng::from_entropy();
            (Identity::random(&mut rng), registration_username(&mut rng))
        };

        self.stats.lock().await.record_sent(false);
        let started = Instant::now();
        let status = self
            .client
            .post(self.url(REGISTER_PATH))
            .header(USER_AGENT, identity.user_agent)
            .header("X-Forwarded-For", identity.ip_address)
            .json(&json!({ "username": username, "password": "password123" }))
            .send()
            .await
            .map(|response| response.status())
            .ok();

        let attempt = Attempt {
            identity,
            status,
            body_read: status.is_some(),
        };
        let elapsed = started.elapsed();
        self.stats.lock().await.record(&RequestRecord {
            path: REGISTER_PATH,
            user_agent: identity.user_agent,
            ip_address: identity.ip_address,
            elapsed,
            success: attempt.succeeded(),
        });

        let status = attempt.status_label();
        if attempt.succeeded() {
            info!(
                "POST {REGISTER_PATH} - {status} ({}ms) - anonymous - Forced user registration",
                elapsed.as_millis()
            );
        } else {
            warn!(
                "POST {REGISTER_PATH} - {status} ({}ms) - anonymous - Forced user registration",
                elapsed.as_millis()
            );
        }
    }
}
