// ABOUTME: HTTP server assembly: merges domain routers and applies the middleware stack
// ABOUTME: Binds the listener, seeds the user file and shuts down on Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HTTP Server
//!
//! Layer order, outermost first: CORS, request tracing, request ID, panic
//! recovery, body size limit. Unmatched paths fall through to a JSON 404.

use std::any::Any;
use std::future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use insurance_core::errors::AppError;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::middleware::{http_trace_layer, request_id_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{
    AccountRoutes, AdminRoutes, AuthRoutes, CustomerRoutes, DocumentRoutes, HealthRoutes,
    MemberRoutes, PolicyRoutes, SupportRoutes,
};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let verbose_errors = resources.config.errors.verbose;
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(PolicyRoutes::routes(Arc::clone(&resources)))
        .merge(CustomerRoutes::routes(Arc::clone(&resources)))
        .merge(AccountRoutes::routes(Arc::clone(&resources)))
        .merge(AdminRoutes::routes(Arc::clone(&resources)))
        .merge(DocumentRoutes::routes(Arc::clone(&resources)))
        .merge(SupportRoutes::routes(Arc::clone(&resources)))
        .merge(MemberRoutes::routes(resources))
        .fallback(handle_not_found)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(verbose_errors, panic.as_ref()),
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(http_trace_layer())
        .layer(cors)
}

async fn handle_not_found(uri: Uri) -> AppError {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    debug!(path = %path, "no route matched");
    AppError::not_found(format!("Route {path}"))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "unknown panic".to_owned())
}

fn panic_response(verbose: bool, panic: &(dyn Any + Send)) -> Response {
    let message = panic_message(panic);
    error!("handler panicked: {message}");

    let error = AppError::internal("An unexpected error occurred");
    let error = if verbose {
        error
            .with_detail("details", message.clone())
            .with_detail("stack", vec![message])
    } else {
        error
    };
    error.into_response()
}

/// Start the API on the configured address and serve until shutdown
///
/// # Errors
///
/// Returns an error if the address is invalid, the user file cannot be
/// seeded, or the listener cannot be bound
pub async fn run(config: ServerConfig) -> Result<()> {
    let addr = config.http.bind_addr()?;
    let resources = Arc::new(ServerResources::new(config)?);

    let seeded = resources
        .user_store
        .ensure_seeded()
        .await
        .context("Failed to seed user file")?;
    if seeded {
        info!(
            path = %resources.user_store.path().display(),
            "Seeded user file with training accounts"
        );
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Insurance API listening on http://{addr}");

    serve_on(listener, resources).await
}

/// Serve the API on an already bound listener until shutdown
///
/// # Errors
///
/// Returns an error if the server loop fails
pub async fn serve_on(listener: TcpListener, resources: Arc<ServerResources>) -> Result<()> {
    axum::serve(listener, build_router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
