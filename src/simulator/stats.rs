// ABOUTME: In-memory counters for a traffic simulation run and the end-of-run summary
// ABOUTME: Tracks per-endpoint outcomes, header histograms, response times and login activity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

/// Success and failure counts for one endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EndpointCounts {
    /// 2xx responses
    pub success: u64,
    /// Non-2xx responses and transport errors
    pub failed: u64,
}

impl EndpointCounts {
    /// Requests sent to this endpoint
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.success + self.failed
    }
}

/// One finished request as seen by the statistics
#[derive(Debug, Clone)]
pub struct RequestRecord<'a> {
    /// Endpoint path used as the histogram key
    pub path: &'a str,
    /// `User-Agent` sent
    pub user_agent: &'a str,
    /// `X-Forwarded-For` sent
    pub ip_address: &'a str,
    /// Wall time from send to response
    pub elapsed: Duration,
    /// Whether the response was 2xx
    pub success: bool,
}

/// Whole-run statistics
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStats {
    /// Requests sent, retries included
    pub total_requests: u64,
    /// 2xx responses
    pub successful_requests: u64,
    /// Everything else
    pub failed_requests: u64,
    /// Counts by endpoint path
    pub endpoints: HashMap<String, EndpointCounts>,
    /// Counts by user agent
    pub user_agents: HashMap<String, u64>,
    /// Counts by forwarded client address
    pub ip_addresses: HashMap<String, u64>,
    /// Response times in milliseconds
    pub response_times_ms: Vec<u64>,
    /// Accounts currently holding a session
    pub authenticated_users: BTreeSet<String>,
    /// Login attempts at the start of each account's turn
    pub login_attempts: u64,
    /// Logins that returned a token
    pub successful_logins: u64,
    /// Requests sent with a bearer token
    pub auth_required_requests: u64,
    /// Requests sent without one
    pub public_requests: u64,
}

impl SimulationStats {
    /// Create empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished request
    pub fn record(&mut self, record: &RequestRecord<'_>) {
        self.total_requests += 1;
        let counts = self.endpoints.entry(record.path.to_owned()).or_default();
        if record.success {
            self.successful_requests += 1;
            counts.success += 1;
        } else {
            self.failed_requests += 1;
            counts.failed += 1;
        }
        *self
            .user_agents
            .entry(record.user_agent.to_owned())
            .or_default() += 1;
        *self
            .ip_addresses
            .entry(record.ip_address.to_owned())
            .or_default() += 1;
        self.response_times_ms
            .push(u64::try_from(record.elapsed.as_millis()).unwrap_or(u64::MAX));
    }

    /// Count a request by whether it carried a token
    pub fn record_sent(&mut self, authenticated: bool) {
        if authenticated {
            self.auth_required_requests += 1;
        } else {
            self.public_requests += 1;
        }
    }

    /// Note a successful login for `username`
    pub fn record_login(&mut self, username: &str) {
        self.successful_logins += 1;
        self.authenticated_users.insert(username.to_owned());
    }

    /// Forget `username` after its session was dropped
    pub fn forget_user(&mut self, username: &str) {
        self.authenticated_users.remove(username);
    }

    /// Percentage of requests that succeeded
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64 * 100.0
        }
    }

    /// Mean response time in milliseconds
    #[must_use]
    pub fn average_response_ms(&self) -> f64 {
        if self.response_times_ms.is_empty() {
            0.0
        } else {
            self.response_times_ms.iter().sum::<u64>() as f64 / self.response_times_ms.len() as f64
        }
    }

    /// Throughput over `elapsed`
    #[must_use]
    pub fn requests_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_requests as f64 / secs
        } else {
            0.0
        }
    }

    /// Busiest endpoints, most requests first
    #[must_use]
    pub fn top_endpoints(&self, limit: usize) -> Vec<(&str, EndpointCounts)> {
        let mut ranked: Vec<_> = self
            .endpoints
            .iter()
            .map(|(path, counts)| (path.as_str(), *counts))
            .collect();
        ranked.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Most used user agents
    #[must_use]
    pub fn top_user_agents(&self, limit: usize) -> Vec<(&str, u64)> {
        top_counts(&self.user_agents, limit)
    }

    /// Most used client addresses
    #[must_use]
    pub fn top_ip_addresses(&self, limit: usize) -> Vec<(&str, u64)> {
        top_counts(&self.ip_addresses, limit)
    }

    /// Human-readable report for the end of a run
    #[must_use]
    pub fn render_summary(&self, elapsed: Duration) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TRAFFIC SIMULATION STATISTICS");
        let _ = writeln!(out, "=====================================");
        let _ = writeln!(out, "Duration: {:.2} seconds", elapsed.as_secs_f64());
        let _ = writeln!(out, "Total Requests: {}", self.total_requests);
        let _ = writeln!(out, "Successful: {}", self.successful_requests);
        let _ = writeln!(out, "Failed: {}", self.failed_requests);
        let _ = writeln!(out, "Success Rate: {:.2}%", self.success_rate());
        let _ = writeln!(
            out,
            "Average Response Time: {:.2}ms",
            self.average_response_ms()
        );
        let _ = writeln!(
            out,
            "Requests/Second: {:.2}",
            self.requests_per_second(elapsed)
        );
        let _ = writeln!(out, "Login Attempts: {}", self.login_attempts);
        let _ = writeln!(out, "Successful Logins: {}", self.successful_logins);
        let _ = writeln!(
            out,
            "Authenticated Users: {}",
            self.authenticated_users.len()
        );
        let _ = writeln!(
            out,
            "Authenticated Requests: {}",
            self.auth_required_requests
        );
        let _ = writeln!(out, "Public Requests: {}", self.public_requests);

        let _ = writeln!(out, "\nTop Endpoints:");
        for (path, counts) in self.top_endpoints(10) {
            let _ = writeln!(
                out,
                "  {path}: {} requests ({} ok, {} failed)",
                counts.total(),
                counts.success,
                counts.failed
            );
        }

        let _ = writeln!(out, "\nUser Agents Used:");
        for (agent, count) in self.top_user_agents(5) {
            let short: String = agent.chars().take(50).collect();
            let _ = writeln!(out, "  {short}...: {count} requests");
        }

        let _ = writeln!(out, "\nIP Addresses Used:");
        for (ip, count) in self.top_ip_addresses(5) {
            let _ = writeln!(out, "  {ip}: {count} requests");
        }

        let _ = writeln!(out, "\nAuthenticated Users:");
        for username in self.authenticated_users.iter().take(10) {
            let _ = writeln!(out, "  {username}");
        }
        out
    }
}

fn top_counts(counts: &HashMap<String, u64>, limit: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<_> = counts
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(path: &'a str, ip: &'a str, success: bool) -> RequestRecord<'a> {
        RequestRecord {
            path,
            user_agent: "agent",
            ip_address: ip,
            elapsed: Duration::from_millis(20),
            success,
        }
    }

    #[test]
    fn test_counts_and_rates() {
        let mut stats = SimulationStats::new();
        stats.record(&record("/api/health", "10.0.0.50", true));
        stats.record(&record("/api/health", "10.0.0.51", true));
        stats.record(&record("/api/admin/reports", "10.0.0.50", false));

        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert!((stats.average_response_ms() - 20.0).abs() < f64::EPSILON);
        assert!((stats.success_rate() - 200.0 / 3.0).abs() < 1e-9);

        let top = stats.top_endpoints(1);
        assert_eq!(top[0].0, "/api/health");
        assert_eq!(top[0].1.total(), 2);
        assert_eq!(stats.top_ip_addresses(1)[0], ("10.0.0.50", 2));
    }

    #[test]
    fn test_empty_stats_do_not_divide_by_zero() {
        let stats = SimulationStats::new();
        assert!(stats.success_rate().abs() < f64::EPSILON);
        assert!(stats.average_response_ms().abs() < f64::EPSILON);
        assert!(stats.requests_per_second(Duration::ZERO).abs() < f64::EPSILON);
        assert!(stats
            .render_summary(Duration::from_secs(1))
            .contains("Total Requests: 0"));
    }

    #[test]
    fn test_login_tracking() {
        let mut stats = SimulationStats::new();
        stats.record_login("user1");
        stats.record_login("admin1");
        stats.forget_user("user1");

        assert_eq!(stats.successful_logins, 2);
        assert_eq!(
            stats.authenticated_users.iter().collect::<Vec<_>>(),
            vec!["admin1"]
        );
    }
}
