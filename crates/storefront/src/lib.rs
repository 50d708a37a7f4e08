//! Plantify Storefront library.
//!
//! This crate provides the storefront as a library, allowing it to be tested
//! and reused. [`app`] builds the complete router; the binary adds error
//! tracking and serves it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Directory holding static assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router with sessions, tracing and static files.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span)),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
