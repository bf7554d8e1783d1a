//! # sitehost-api
//!
//! HTTP API layer for SiteHost built on Axum.
//!
//! Provides the deployment management endpoints, the public static file
//! routes, request-logging middleware, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
