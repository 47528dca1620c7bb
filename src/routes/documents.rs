// ABOUTME: Document preview route that fetches a caller-chosen URL from the server
// ABOUTME: No scheme, host or address validation is applied before fetching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Document preview routes
//!
//! With `DOCUMENT_PREVIEW_LIVE_FETCH` enabled the server performs a real GET
//! against whatever `url` the body names, loopback and private ranges
//! included, and returns the response text. Otherwise canned content naming
//! the URL is returned.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use bytes::Bytes;
use chrono::Utc;
use insurance_core::constants::documents::DEFAULT_PREVIEW_URL;
use insurance_core::errors::{AppError, AppResult, ErrorCode};
use serde::Serialize;
use tracing::{info, warn};

use crate::logging::AppLogger;
use crate::mock_data;
use crate::resources::ServerResources;
use crate::routes::{parse_object_body_or_empty, string_field};

/// Preview response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Fetched or canned document text
    pub content: String,
    /// When the content was produced
    pub fetched_at: String,
    /// URL the content came from
    pub source: String,
}

/// Document routes
pub struct DocumentRoutes;

impl DocumentRoutes {
    /// Create document routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/documents/preview", post(Self::handle_preview))
            .with_state(resources)
    }

    async fn handle_preview(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> AppResult<Json<PreviewResponse>> {
        let body = parse_object_body_or_empty(&body)?;
        let url = string_field(&body, "url")
            .unwrap_or(DEFAULT_PREVIEW_URL)
            .to_owned();

        let content = if resources.config.preview.live_fetch {
            AppLogger::log_security_event(
                "server-side-request-forgery",
                "/api/documents/preview",
                &format!("fetching unvalidated URL {url}"),
                None,
            );
            Self::fetch(&resources, &url).await?
        } else {
            info!(url = %url, "serving canned document preview");
            mock_data::preview_content(&url)
        };

        Ok(Json(PreviewResponse {
            content,
            fetched_at: Utc::now().to_rfc3339(),
            source: url,
        }))
    }

    async fn fetch(resources: &ServerResources, url: &str) -> AppResult<String> {
        let fetched = async {
            let response = resources.http_client.get(url).send().await?;
            info!(url = %url, status = %response.status(), "document preview fetched");
            response.text().await
        }
        .await;

        fetched.map_err(|e| {
            warn!(url = %url, "document preview fetch failed: {e}");
            resources.surface_error(
                AppError::new(ErrorCode::PreviewError, format!("Could not fetch {url}"))
                    .with_error_chain(&e)
                    .with_source(e),
            )
        })
    }
}
