// ABOUTME: Policy search record returned by the unbounded search endpoint
// ABOUTME: Field names follow the camelCase JSON the browser client expects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One generated policy row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    /// Sequential id starting at 1
    pub id: u32,
    /// `POL-` followed by the zero-padded id
    pub policy_number: String,
    /// Random "First Last" holder name
    pub holder_name: String,
    /// Policy status
    pub status: String,
    /// Coverage line
    pub coverage: String,
    /// Expiry date
    pub expires_on: NaiveDate,
}

impl PolicySummary {
    /// Case-insensitive substring match over holder, number, status and coverage
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        [
            &self.holder_name,
            &self.policy_number,
            &self.status,
            &self.coverage,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PolicySummary {
        PolicySummary {
            id: 42,
            policy_number: "POL-000042".to_owned(),
            holder_name: "Sarah Garcia".to_owned(),
            status: "Active".to_owned(),
            coverage: "Home".to_owned(),
            expires_on: NaiveDate::from_ymd_opt(2027, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_matches_any_field() {
        let policy = sample();
        assert!(policy.matches("garcia"));
        assert!(policy.matches("pol-000042"));
        assert!(policy.matches("act"));
        assert!(policy.matches("home"));
        assert!(!policy.matches("auto"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["policyNumber"], "POL-000042");
        assert_eq!(json["expiresOn"], "2027-05-01");
    }
}
