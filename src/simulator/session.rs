// ABOUTME: Per-username session token cache shared by concurrent simulated users
// ABOUTME: Token expiry is read from the unverified payload so stale sessions are dropped before use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::auth::AuthManager;

/// A logged-in account's token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token
    pub token: String,
    /// Role reported by the login response
    pub role: String,
    /// `exp` claim in seconds, `None` when the payload could not be read
    pub expires_at: Option<i64>,
}

impl Session {
    /// Build a session, reading `exp` from the token payload
    #[must_use]
    pub fn from_token(token: String, role: String) -> Self {
        let expires_at = AuthManager::decode_unverified(&token)
            .ok()
            .map(|claims| claims.exp);
        Self {
            token,
            role,
            expires_at,
        }
    }

    /// Unreadable tokens count as expired
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(exp) => exp < now.timestamp(),
            None => true,
        }
    }
}

/// Sessions keyed by username
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: Mutex<HashMap<String, Session>>,
}

/// Result of looking a session up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Usable session
    Valid(Session),
    /// A session existed but its token has expired; it has been removed
    Expired,
    /// No session for this username
    Missing,
}

impl SessionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the session for `username`
    pub async fn insert(&self, username: &str, session: Session) {
        self.sessions
            .lock()
            .await
            .insert(username.to_owned(), session);
    }

    /// Remove the session for `username`, returning whether one existed
    pub async fn remove(&self, username: &str) -> bool {
        self.sessions.lock().await.remove(username).is_some()
    }

    /// Whether any session, expired or not, exists for `username`
    pub async fn contains(&self, username: &str) -> bool {
        self.sessions.lock().await.contains_key(username)
    }

    /// Fetch a usable session, dropping it if expired
    pub async fn lookup(&self, username: &str) -> Lookup {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(username) {
            None => Lookup::Missing,
            Some(session) if session.is_expired_at(Utc::now()) => {
                sessions.remove(username);
                Lookup::Expired
            }
            Some(session) => Lookup::Valid(session.clone()),
        }
    }

    /// Number of cached sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
