// ABOUTME: Core types and constants for the insurance API security lab
// ABOUTME: Foundation crate with error handling, domain models, pagination, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Insurance Core
//!
//! Shared types for the insurance API lab workspace. The server crate, the
//! traffic simulator and the probes all speak in terms of these types, so
//! they change rarely and stay free of HTTP-server dependencies unless the
//! `http-response` feature is enabled.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the flat JSON error body
//! - **models**: users, roles, session claims and policy records
//! - **pagination**: page/per-page metadata for list endpoints
//! - **constants**: defaults shared by the server and its clients

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page-number pagination metadata
pub mod pagination;

/// Core data models (User, Role, Claims, policy records)
pub mod models;
