// ABOUTME: Traffic simulator settings read from CLI flags with environment fallbacks
// ABOUTME: Target URL, run length, round interval, concurrency and per-request pacing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use insurance_core::constants::network::DEFAULT_BASE_URL;

/// Simulator configuration
///
/// Every option can be given as a flag or through its environment variable.
#[derive(Debug, Clone, Args)]
pub struct SimulatorConfig {
    /// API base URL to send traffic to
    #[arg(long, env = "TRAFFIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How long to keep starting new rounds, in minutes
    #[arg(long = "duration", env = "SIMULATION_DURATION", default_value_t = 5.0)]
    pub duration_minutes: f64,

    /// Base pause between rounds in milliseconds; the actual pause is 1x to 2x this
    #[arg(long = "interval", env = "REQUEST_INTERVAL", default_value_t = 15_000)]
    pub request_interval_ms: u64,

    /// Accounts driven concurrently in each round
    #[arg(long, env = "CONCURRENT_USERS", default_value_t = 8)]
    pub concurrent_users: usize,

    /// Upper bound on requests per account per round
    #[arg(long, env = "MAX_REQUESTS_PER_USER", default_value_t = 30)]
    pub max_requests_per_user: u32,

    /// Shortest pause before each request, in milliseconds
    #[arg(long, env = "MIN_REQUEST_DELAY_MS", default_value_t = 1_000)]
    pub min_request_delay_ms: u64,

    /// Longest pause before each request, in milliseconds
    #[arg(long, env = "MAX_REQUEST_DELAY_MS", default_value_t = 4_000)]
    pub max_request_delay_ms: u64,

    /// Stop after this many rounds even if time remains
    #[arg(long = "rounds", env = "SIMULATION_ROUNDS")]
    pub max_rounds: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "TRAFFIC_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            duration_minutes: 5.0,
            request_interval_ms: 15_000,
            concurrent_users: 8,
            max_requests_per_user: 30,
            min_request_delay_ms: 1_000,
            max_request_delay_ms: 4_000,
            max_rounds: None,
            request_timeout_secs: 10,
        }
    }
}

impl SimulatorConfig {
    /// Check option combinations clap cannot express
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive duration, zero users or requests,
    /// or a delay range whose minimum exceeds its maximum
    pub fn validate(&self) -> Result<()> {
        if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
            bail!(
                "duration must be a positive number of minutes, got {}",
                self.duration_minutes
            );
        }
        if self.concurrent_users == 0 {
            bail!("concurrent users must be at least 1");
        }
        if self.max_requests_per_user == 0 {
            bail!("max requests per user must be at least 1");
        }
        if self.min_request_delay_ms > self.max_request_delay_ms {
            bail!(
                "min request delay ({}ms) exceeds max request delay ({}ms)",
                self.min_request_delay_ms,
                self.max_request_delay_ms
            );
        }
        Ok(())
    }

    /// Total run length
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_minutes.max(0.0) * 60.0)
    }

    /// Range the pause between rounds is drawn from
    #[must_use]
    pub fn round_pause_ms(&self) -> RangeInclusive<u64> {
        self.request_interval_ms..=self.request_interval_ms.saturating_mul(2)
    }

    /// Range the pause before each request is drawn from
    #[must_use]
    pub const fn request_delay_ms(&self) -> RangeInclusive<u64> {
        self.min_request_delay_ms..=self.max_request_delay_ms
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// One-line description for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "target={} duration={}min users={} max_requests={} interval={}ms delay={}..={}ms rounds={}",
            self.base_url(),
            self.duration_minutes,
            self.concurrent_users,
            self.max_requests_per_user,
            self.request_interval_ms,
            self.min_request_delay_ms,
            self.max_request_delay_ms,
            self.max_rounds
                .map_or_else(|| "unbounded".to_owned(), |n| n.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duration(), Duration::from_secs(300));
        assert_eq!(config.round_pause_ms(), 15_000..=30_000);
        assert_eq!(config.request_delay_ms(), 1_000..=4_000);
    }

    #[test]
    fn test_rejects_inverted_delay_range() {
        let config = SimulatorConfig {
            min_request_delay_ms: 500,
            max_request_delay_ms: 100,
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_users() {
        let config = SimulatorConfig {
            concurrent_users: 0,
            ..SimulatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = SimulatorConfig {
            base_url: "http://localhost:3001/".into(),
            ..SimulatorConfig::default()
        };
        assert_eq!(config.base_url(), "http://localhost:3001");
    }
}
