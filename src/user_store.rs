// ABOUTME: Flat-file user store backed by a pretty-printed JSON array
// ABOUTME: Read-then-write registration without locking, seeded with the training accounts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # User Store
//!
//! Users live in a single JSON file. Every operation re-reads the file;
//! registration reads, appends and rewrites it with no lock held in between,
//! so concurrent registrations can overwrite each other.

use std::io;
use std::path::{Path, PathBuf};

use insurance_core::errors::AppError;
use insurance_core::models::{Role, User};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};

/// User store failures
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Username already taken
    #[error("username '{0}' already exists")]
    Duplicate(String),
    /// User file could not be written
    #[error("failed to write user file {path}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// User list could not be serialized
    #[error("failed to serialize users")]
    Serialize(#[from] serde_json::Error),
}

impl From<UserStoreError> for AppError {
    fn from(err: UserStoreError) -> Self {
        if matches!(err, UserStoreError::Duplicate(_)) {
            return Self::already_exists("Please choose a different username");
        }
        Self::storage("An error occurred while saving users")
            .with_error_chain(&err)
            .with_source(err)
    }
}

/// Accounts shipped with the lab
#[must_use]
pub fn seed_users() -> Vec<User> {
    [
        ("admin1", "adminpass", Role::Admin),
        ("admin2", "admin123", Role::Admin),
        ("user1", "userpass", Role::User),
        ("user2", "user123", Role::User),
        ("john.smith", "password123", Role::User),
        ("sarah.johnson", "sarah2024", Role::User),
        ("admin.user", "admin@insurance", Role::Admin),
        ("mike.davis", "mike123", Role::User),
        ("emily.wilson", "emily2024", Role::User),
        ("weakuser1", "123", Role::User),
        ("weakuser2", "123456", Role::User),
        ("weakuser3", "password", Role::User),
    ]
    .into_iter()
    .map(|(username, password, role)| User::new(username, password, role))
    .collect()
}

/// JSON-file user store
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the seed accounts if the file does not exist yet
    ///
    /// Returns `true` when the file was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written
    pub async fn ensure_seeded(&self) -> Result<bool, UserStoreError> {
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }
        let seeds = seed_users();
        self.save_users(&seeds).await?;
        info!(path = %self.path.display(), count = seeds.len(), "Seeded user file");
        Ok(true)
    }

    /// Read all users
    ///
    /// A missing or unparsable file is logged and treated as empty.
    pub async fn load_users(&self) -> Vec<User> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(path = %self.path.display(), "Error loading users: {e}");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            error!(path = %self.path.display(), "Error parsing users: {e}");
            Vec::new()
        })
    }

    /// Overwrite the file with `users`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn save_users(&self, users: &[User]) -> Result<(), UserStoreError> {
        let json = serde_json::to_string_pretty(users)?;
        fs::write(&self.path, json)
            .await
            .map_err(|source| self.write_error(source))
    }

    /// Look up a user by exact username
    pub async fn find_user(&self, username: &str) -> Option<User> {
        self.load_users()
            .await
            .into_iter()
            .find(|user| user.username == username)
    }

    /// Plaintext username/password match
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        self.find_user(username)
            .await
            .filter(|user| user.password == password)
    }

    /// Append a new `user`-role account
    ///
    /// No password policy is applied.
    ///
    /// # Errors
    ///
    /// Returns [`UserStoreError::Duplicate`] if the username exists, or a
    /// write error if the file cannot be saved
    pub async fn register(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        let mut users = self.load_users().await;
        if users.iter().any(|user| user.username == username) {
            return Err(UserStoreError::Duplicate(username.to_owned()));
        }

        let user = User::new(username, password, Role::User);
        users.push(user.clone());
        self.save_users(&users).await?;
        debug!(username, total = users.len(), "Registered user");
        Ok(user)
    }

    fn write_error(&self, source: io::Error) -> UserStoreError {
        UserStoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
