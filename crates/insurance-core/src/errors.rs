// ABOUTME: Unified error types with standard error codes and HTTP status mapping
// ABOUTME: Renders every failure as the flat {error, message, code, ...details} JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every handler in the API returns [`AppResult`]. An [`AppError`] carries a
//! machine-readable [`ErrorCode`], a human message and optional detail fields
//! that are flattened into the response body next to `error`, `message` and
//! `code`. The browser client reads those keys directly, so the body stays flat.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation
    /// A required body or query field was absent or empty
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// A field was present but carried an unusable value
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A field did not match its expected format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat,

    // Authentication
    /// No bearer token was supplied
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Username/password pair did not match a stored user
    #[serde(rename = "AUTH_FAILED")]
    AuthFailed,
    /// Token failed verification on a handler-verified route
    #[serde(rename = "INVALID_TOKEN")]
    InvalidToken,
    /// Token verification failed because `exp` has passed
    #[serde(rename = "TOKEN_EXPIRED")]
    TokenExpired,
    /// Token failed verification inside the shared auth extractor
    #[serde(rename = "TOKEN_REJECTED")]
    TokenRejected,

    // Authorization
    /// Caller's role does not allow the action
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,
    /// Admin-only settings or reports were requested by a non-admin
    #[serde(rename = "ADMIN_ACCESS_REQUIRED")]
    AdminAccessRequired,

    // Resources
    /// Unknown route or record
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// Record with the same key already exists
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists,

    // Internal
    /// Document preview fetch failed
    #[serde(rename = "PREVIEW_ERROR")]
    PreviewError,
    /// User file could not be written
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Anything else
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::MissingRequiredField | Self::InvalidInput | Self::InvalidFormat => 400,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthFailed | Self::InvalidToken | Self::TokenExpired => 401,

            // 403 Forbidden
            Self::TokenRejected | Self::PermissionDenied | Self::AdminAccessRequired => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists => 409,

            // 500 Internal Server Error
            Self::PreviewError | Self::StorageError | Self::InternalError => 500,
        }
    }

    /// Short title rendered in the `error` field of the response body
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "Missing required field",
            Self::InvalidInput => "Invalid input",
            Self::InvalidFormat => "Invalid format",
            Self::AuthRequired => "Authentication required",
            Self::AuthFailed => "Invalid credentials",
            Self::InvalidToken | Self::TokenRejected => "Invalid token",
            Self::TokenExpired => "Token expired",
            Self::PermissionDenied | Self::AdminAccessRequired => "Access denied",
            Self::ResourceNotFound => "Not found",
            Self::ResourceAlreadyExists => "Already exists",
            Self::PreviewError => "Document preview failed",
            Self::StorageError | Self::InternalError => "Internal server error",
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthFailed => "The provided credentials are invalid",
            Self::InvalidToken => "The authentication token failed verification",
            Self::TokenExpired => "The authentication token has expired",
            Self::TokenRejected => "The authentication token was rejected",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::AdminAccessRequired => "Admin privileges are required for this action",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::PreviewError => "The document preview could not be fetched",
            Self::StorageError => "Storage operation failed",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether this code maps to a 5xx response
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Extra fields flattened into the response body
    pub details: Map<String, Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
            source: None,
        }
    }

    /// Attach one extra field to the response body
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Record the full cause chain of `err` as `details` and `stack` fields
    ///
    /// This is what a verbose 500 response exposes to the caller.
    #[must_use]
    pub fn with_error_chain(self, err: &(dyn StdError + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = Some(err);
        while let Some(cause) = current {
            chain.push(Value::String(cause.to_string()));
            current = cause.source();
        }
        self.with_detail("details", err.to_string())
            .with_detail("stack", Value::Array(chain))
    }

    /// Strip internal detail from server errors
    ///
    /// Client errors (4xx) keep their details since they describe the request,
    /// not the server. The source error is kept for logging.
    #[must_use]
    pub fn redacted(mut self) -> Self {
        if self.code.is_server_error() {
            self.details.clear();
            self.message = self.code.description().to_owned();
        }
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.title(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short title of the failure
    pub error: String,
    /// Human-readable explanation
    pub message: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Endpoint-specific extra fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: error.code.title().to_owned(),
            message: error.message,
            code: error.code,
            details: error.details,
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// No bearer token on a protected route
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authorization token is required")
    }

    /// Wrong username or password
    #[must_use]
    pub fn auth_failed() -> Self {
        Self::new(ErrorCode::AuthFailed, "Username or password is incorrect")
    }

    /// Token failed verification
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    /// Token has expired
    #[must_use]
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired, "Please log in again")
    }

    /// Role insufficient for the requested action
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Admin-only action requested by a non-admin
    pub fn admin_access_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AdminAccessRequired, message)
    }

    /// Required field missing
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Resource already exists
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid format
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Storage failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(format!("Request body is not valid JSON: {error}"))
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;

    use super::{AppError, ErrorResponse};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }
}
