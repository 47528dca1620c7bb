// ABOUTME: Policy category, search, personal policy and policy-by-id route handlers
// ABOUTME: Search has no page size ceiling and the PII records require no authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Policy routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use insurance_core::constants::policies::{CATEGORIES, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use insurance_core::models::PolicySummary;
use insurance_core::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::logging::AppLogger;
use crate::mock_data;
use crate::resources::ServerResources;

/// Page sizes above this are served but logged
const SANE_PAGE_SIZE: u64 = 100;

/// Raw search query string; values are parsed leniently
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text filter
    pub query: Option<String>,
    /// 1-based page
    pub page: Option<String>,
    /// Page size, unbounded
    pub per_page: Option<String>,
}

impl SearchParams {
    /// Page number; unparseable values use the default, values below 1 become 1
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map_or(DEFAULT_PAGE, |page| u64::try_from(page.max(1)).unwrap_or(DEFAULT_PAGE))
    }

    /// Page size; unparseable, zero or negative values use the default
    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PER_PAGE)
    }
}

/// Search response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Records on the requested page
    pub policies: Vec<PolicySummary>,
    /// Page metadata
    pub pagination: PaginationMeta,
    /// Echo of the query
    pub search_query: String,
    /// Response time
    pub timestamp: String,
}

/// Policy routes
pub struct PolicyRoutes;

impl PolicyRoutes {
    /// Create all policy routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/policies/categories", get(Self::handle_categories))
            .route("/api/policies/search", get(Self::handle_search))
            .route("/api/policies/mine", get(Self::handle_mine))
            .route("/api/policies/:id", get(Self::handle_policy_by_id))
            .with_state(resources)
    }

    async fn handle_categories() -> Json<&'static [&'static str]> {
        Json(CATEGORIES)
    }

    /// Search the generated policy set
    async fn handle_search(Query(params): Query<SearchParams>) -> Json<SearchResponse> {
        let query = params.query.clone().unwrap_or_default();
        let page = params.page();
        let per_page = params.per_page();

        let matches = mock_data::search_policies(&query);
        let pagination = PaginationMeta::new(page, per_page, matches.len() as u64);
        let policies = pagination.slice(&matches).to_vec();

        info!(
            query = %query,
            page,
            per_page,
            returned = policies.len(),
            total = pagination.total,
            "policy search"
        );
        if per_page > SANE_PAGE_SIZE {
            AppLogger::log_security_event(
                "excessive-record-retrieval",
                "/api/policies/search",
                &format!("per_page={per_page} returned {} records", policies.len()),
                None,
            );
        }

        Json(SearchResponse {
            policies,
            pagination,
            search_query: query,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// The demo holder's policy, served without authentication
    async fn handle_mine() -> Json<Value> {
        AppLogger::log_security_event(
            "missing-authentication",
            "/api/policies/mine",
            "policy PII served without a token",
            None,
        );
        Json(mock_data::my_policy())
    }

    /// Any policy by id, served without an ownership check
    async fn handle_policy_by_id(Path(id): Path<String>) -> Json<Value> {
        AppLogger::log_security_event(
            "broken-object-level-authorization",
            "/api/policies/:id",
            &format!("policy {id} served without an ownership check"),
            None,
        );
        Json(json!({ "policy": mock_data::policy_by_id(&id) }))
    }
}
