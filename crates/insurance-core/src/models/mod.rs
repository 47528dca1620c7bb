// ABOUTME: Core data models for the insurance API lab
// ABOUTME: Re-exports User, Role, Claims and policy record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `User`: a stored account (plaintext password, role)
//! - `Role`: `user` or `admin`
//! - `Claims`: the JWT payload carried by every session token
//! - `PolicySummary`: one row of the policy search result set

mod claims;
mod policy;
mod user;

pub use claims::Claims;
pub use policy::PolicySummary;
pub use user::{PublicUser, Role, User};
