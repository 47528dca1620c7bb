// ABOUTME: Session token claims shared by the server, simulator and probes
// ABOUTME: Role is kept as a raw string so tampered values survive decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::user::{Role, User};

/// JWT payload: `{username, role, iat, exp}`
///
/// `iat` and `exp` default to zero when absent so that unverified decoding
/// accepts hand-built payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Login name of the subject
    pub username: String,
    /// Role string as issued or as tampered
    #[serde(default)]
    pub role: String,
    /// Issued-at, seconds since the epoch
    #[serde(default)]
    pub iat: i64,
    /// Expiry, seconds since the epoch
    #[serde(default)]
    pub exp: i64,
}

impl Claims {
    /// Claims for a stored user, valid for `lifetime` from `issued_at`
    #[must_use]
    pub fn for_user(user: &User, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    /// Admin check by plain string comparison
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }

    /// Issued-at as a timestamp
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether `exp` is at or before `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
