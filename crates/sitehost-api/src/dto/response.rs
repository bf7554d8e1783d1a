//! Response DTOs.

use serde::{Deserialize, Serialize};

use sitehost_entity::deployment::Deployment;

/// Response for deleting a single deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDeploymentResponse {
    /// Human-readable result message.
    pub message: String,
    /// The record that was removed.
    pub deployment: Deployment,
    /// Present when the metadata row was removed but the directory was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response for deleting every deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAllResponse {
    /// Human-readable result message.
    pub message: String,
    /// Number of metadata rows removed.
    pub deleted_count: u64,
    /// The records that were removed.
    pub deleted_deployments: Vec<Deployment>,
    /// Directories that could not be removed from disk.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failed_paths: Vec<String>,
    /// Present when some directories could not be removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response for rolling back to an earlier deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackResponse {
    /// Human-readable result message.
    pub message: String,
    /// The deployment that was rolled back to.
    pub source_deployment: Deployment,
    /// The new deployment created from the source's files.
    pub new_deployment: Deployment,
}

/// Response for a factory reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Human-readable result message.
    pub message: String,
    /// Number of deployments that existed before the reset.
    pub deleted_count: u64,
    /// Final system status.
    pub status: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
