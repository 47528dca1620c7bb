// ABOUTME: CORS middleware configuration for browser clients of the API
// ABOUTME: Unknown origins are logged and still allowed, mirroring the permissive training setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use http::{header, request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Configure CORS for the API
///
/// The origin is mirrored back for every request so credentials work from
/// any page. Origins outside `CORS_ORIGINS` only produce a warning.
#[must_use]
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let known: Arc<Vec<HeaderValue>> = Arc::new(
        config
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect(),
    );

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
        if !known.contains(origin) {
            warn!(
                origin = origin.to_str().unwrap_or("<non-ascii>"),
                "CORS request from unlisted origin allowed"
            );
        }
        true
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .expose_headers([header::HeaderName::from_static("x-request-id")])
}
