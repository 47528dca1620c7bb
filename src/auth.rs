// ABOUTME: HS256 session token issuance and the four token-checking modes used by handlers
// ABOUTME: Strict verification, expiry-ignoring verification, unverified decoding and re-signing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Tokens
//!
//! Every token is an HS256 JWT signed with one static secret and carrying
//! `{username, role, iat, exp}`. Handlers pick how much of the token they
//! actually check:
//!
//! - [`AuthManager::verify`]: signature and expiry, no leeway
//! - [`AuthManager::verify_ignoring_expiry`]: signature only
//! - [`AuthManager::decode_unverified`]: payload decode, nothing checked
//!
//! [`AuthManager::sign_claims`] re-signs arbitrary claims with the known
//! secret, which is how tampered tokens are produced by the probes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use insurance_core::constants::auth::TOKEN_LIFETIME_SECS;
use insurance_core::models::{Claims, User};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.to_rfc3339())]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl JwtValidationError {
    /// Whether verification failed only because of `exp`
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::TokenExpired { .. })
    }
}

/// Offline view of a token: decoded payload plus the strict verification outcome
#[derive(Debug, Clone)]
pub struct TokenInspection {
    /// Decoded header, `Null` when the header segment is not base64url JSON
    pub header: Value,
    /// Payload decoded without any checks
    pub claims: Claims,
    /// Result of [`AuthManager::verify`]
    pub verification: Result<(), JwtValidationError>,
    /// Reference time for the expiry figures
    pub inspected_at: DateTime<Utc>,
}

impl TokenInspection {
    /// Whether `exp` has passed at inspection time
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.claims.is_expired_at(self.inspected_at)
    }

    /// Time left until `exp`, negative once expired
    ///
    /// `None` when `exp` is too far from now to fit a [`Duration`].
    #[must_use]
    pub fn time_to_expiry(&self) -> Option<Duration> {
        self.claims
            .exp
            .checked_sub(self.inspected_at.timestamp())
            .and_then(Duration::try_seconds)
    }

    /// `"14m 32s"` style rendering of [`Self::time_to_expiry`]
    #[must_use]
    pub fn time_to_expiry_display(&self) -> String {
        let Some(remaining) = self.time_to_expiry() else {
            return "out of range".to_owned();
        };
        let secs = remaining.num_seconds().unsigned_abs();
        let sign = if remaining.num_seconds() < 0 { "-" } else { "" };
        format!("{sign}{}m {}s", secs / 60, secs % 60)
    }
}

/// Issues and checks HS256 session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl AuthManager {
    /// Create a manager for `secret` issuing tokens valid for `token_lifetime`
    #[must_use]
    pub fn new(secret: &[u8], token_lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime,
        }
    }

    /// Manager with the standard 15 minute lifetime
    #[must_use]
    pub fn with_default_lifetime(secret: &[u8]) -> Self {
        Self::new(secret, Duration::seconds(TOKEN_LIFETIME_SECS))
    }

    /// Configured token lifetime
    #[must_use]
    pub const fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Generate a session token for a stored user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let claims = Claims::for_user(user, Utc::now(), self.token_lifetime);
        self.sign_claims(&claims)
    }

    /// Sign arbitrary claims with the server secret
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn sign_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }

    /// Verify signature and expiry with zero leeway
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError::TokenExpired`] when `exp` has passed and
    /// `TokenInvalid`/`TokenMalformed` for everything else
    pub fn verify(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_token_claims(token)?;
        Self::validate_claims_expiry(&claims, Utc::now())?;
        debug!(username = %claims.username, "token verified");
        Ok(claims)
    }

    /// Verify the signature but accept tokens past their `exp`
    ///
    /// # Errors
    ///
    /// Returns an error if the signature or token format is invalid
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_token_claims(token)?;
        if claims.is_expired_at(Utc::now()) {
            warn!(
                username = %claims.username,
                exp = claims.exp,
                "accepting expired token"
            );
        }
        Ok(claims)
    }

    /// Decode the payload segment without checking the signature or header
    ///
    /// Any token whose second segment is base64url JSON with a `username`
    /// is accepted, including `alg: none` tokens and forged signatures.
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError::TokenMalformed`] if the payload cannot be decoded
    pub fn decode_unverified(token: &str) -> Result<Claims, JwtValidationError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| JwtValidationError::TokenMalformed {
                details: "Token has no payload segment".into(),
            })?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {e}"),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| JwtValidationError::TokenMalformed {
            details: format!("Token contains invalid JSON: {e}"),
        })
    }

    /// Decode `token` and record how strict verification treats it
    ///
    /// # Errors
    ///
    /// Returns an error only if the payload cannot be decoded at all
    pub fn inspect(&self, token: &str) -> Result<TokenInspection, JwtValidationError> {
        let claims = Self::decode_unverified(token)?;
        let header = token
            .split('.')
            .next()
            .and_then(|segment| URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok())
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or(Value::Null);

        Ok(TokenInspection {
            header,
            claims,
            verification: self.verify(token).map(|_| ()),
            inspected_at: Utc::now(),
        })
    }

    /// Decode HS256 claims checking the signature only
    fn decode_token_claims(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Check `exp` against `current_time`
    fn validate_claims_expiry(
        claims: &Claims,
        current_time: DateTime<Utc>,
    ) -> Result<(), JwtValidationError> {
        if !claims.is_expired_at(current_time) {
            return Ok(());
        }
        let expired_at = claims.expires_at().unwrap_or(current_time);
        warn!(
            username = %claims.username,
            "JWT token expired {} ago at {}",
            humanize_duration(current_time.signed_duration_since(expired_at)),
            expired_at.to_rfc3339()
        );
        Err(JwtValidationError::TokenExpired {
            expired_at,
            current_time,
        })
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &JwtError) -> JwtValidationError {
        warn!("JWT token validation failed: {e}");

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Utc::now(),
                current_time: Utc::now(),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAlgorithm => JwtValidationError::TokenInvalid {
                reason: "Token algorithm is not HS256".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}
