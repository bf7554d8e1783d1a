//! Route definitions for the SiteHost HTTP API.
//!
//! Management routes sit at the root alongside the public site routes;
//! deployment ids are UUIDs so they cannot collide with the fixed
//! management paths.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    Router::new()
        .merge(deployment_routes())
        .merge(site_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            crate::middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Deployment management endpoints.
fn deployment_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::deployment::upload))
        .route("/deployments", get(handlers::deployment::list))
        .route("/deployments", delete(handlers::deployment::delete_all))
        .route("/deployments/{id}", delete(handlers::deployment::delete))
        .route("/rollback/{id}", post(handlers::deployment::rollback))
        .route("/reset", post(handlers::deployment::reset))
        .route("/health", get(handlers::health::health))
}

/// Public static file routes for deployed sites.
fn site_routes() -> Router<AppState> {
    Router::new().route("/{id}/{*path}", get(handlers::site::serve_file))
}
