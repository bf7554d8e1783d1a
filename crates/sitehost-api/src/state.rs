//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sitehost_core::config::AppConfig;
use sitehost_service::DeploymentService;
use sitehost_storage::StaticResolver;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Deployment lifecycle service
    pub deployment_service: Arc<DeploymentService>,
    /// Static file resolver for the public site routes
    pub resolver: Arc<StaticResolver>,
}
