// ABOUTME: Per-request tracing spans for the HTTP API
// ABOUTME: Builds the tower-http TraceLayer around an http_request span with request and user fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use axum::body::Body;
use http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::{field, info, info_span, Span};

/// Create a tracing span for HTTP requests
#[must_use]
pub fn create_request_span(method: &str, path: &str) -> Span {
    info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = field::Empty,
        username = field::Empty,
        status_code = field::Empty,
        duration_ms = field::Empty,
    )
}

/// Trace layer type produced by [`http_trace_layer`]
pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    (),
    fn(&Response<Body>, Duration, &Span),
>;

fn make_span(request: &Request<Body>) -> Span {
    create_request_span(request.method().as_str(), request.uri().path())
}

fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    let status = response.status().as_u16();
    let duration_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    span.record("status_code", status);
    span.record("duration_ms", duration_ms);
    info!(status, duration_ms, "request completed");
}

/// Trace layer that opens one `http_request` span per request
#[must_use]
pub fn http_trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request<Body>) -> Span)
        .on_request(())
        .on_response(on_response as fn(&Response<Body>, Duration, &Span))
}
