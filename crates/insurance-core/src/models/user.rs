// ABOUTME: User account and role models persisted in the flat-file user store
// ABOUTME: PublicUser is the password-free projection returned by the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard customer account
    #[default]
    User,
    /// Administrator
    Admin,
}

impl Role {
    /// String form used in tokens and the user file
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse a role string as it appears inside claims
    ///
    /// Anything other than the two known roles yields `None`; claims keep the
    /// raw string so a tampered value is still visible to handlers.
    #[must_use]
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user record
///
/// Passwords are kept and compared in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Account role
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Build a user record
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    /// Whether this account holds the admin role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User as exposed over the API (no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Login name
    pub username: String,
    /// Account role
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let user = User::new("admin1", "adminpass", Role::Admin);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"username":"legacy","password":"pw"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_public_user_drops_password() {
        let user = User::new("user1", "userpass", Role::User);
        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_role_from_claim() {
        assert_eq!(Role::from_claim("admin"), Some(Role::Admin));
        assert_eq!(Role::from_claim("superuser"), None);
    }
}
