//! Deployment management handlers: upload, list, delete, rollback, reset.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use bytes::Bytes;

use sitehost_core::error::AppError;
use sitehost_entity::deployment::Deployment;
use sitehost_service::deployment::{PurgeOutcome, UploadParams};

use crate::dto::response::{
    DeleteAllResponse, DeleteDeploymentResponse, ResetResponse, RollbackResponse,
};
use crate::state::AppState;

/// POST /upload
///
/// Accepts a multipart form with a `file` field holding a ZIP archive,
/// deploys it, and returns the new deployment record.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Deployment>, AppError> {
    let mut filename: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file field: {e}")))?,
            );
        }
    }

    let data = data.ok_or_else(|| AppError::validation("Missing 'file' field"))?;
    let filename = filename.ok_or_else(|| AppError::validation("Uploaded file has no filename"))?;

    let deployment = state
        .deployment_service
        .create(UploadParams { filename, data })
        .await?;

    Ok(Json(deployment))
}

/// GET /deployments
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Deployment>>, AppError> {
    let deployments = state.deployment_service.list().await?;
    Ok(Json(deployments))
}

/// DELETE /deployments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteDeploymentResponse>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::validation("Deployment id is required"));
    }

    let outcome = state.deployment_service.delete(&id).await?;
    Ok(Json(DeleteDeploymentResponse {
        message: "Deployment deleted successfully".to_string(),
        deployment: outcome.deployment,
        warning: outcome.cleanup_warning,
    }))
}

/// DELETE /deployments
pub async fn delete_all(
    State(state): State<AppState>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    match state.deployment_service.delete_all().await? {
        PurgeOutcome::Empty => Ok(Json(DeleteAllResponse {
            message: "No deployments to delete".to_string(),
            deleted_count: 0,
            deleted_deployments: Vec::new(),
            failed_paths: Vec::new(),
            warning: None,
        })),
        PurgeOutcome::Purged {
            deployments,
            failed_paths,
        } => {
            let warning = (!failed_paths.is_empty())
                .then(|| "Some deployment directories could not be removed".to_string());
            Ok(Json(DeleteAllResponse {
                message: "All deployments deleted".to_string(),
                deleted_count: deployments.len() as u64,
                deleted_deployments: deployments,
                failed_paths,
                warning,
            }))
        }
    }
}

/// POST /rollback/{id}
pub async fn rollback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RollbackResponse>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::validation("Deployment id is required"));
    }

    let outcome = state.deployment_service.rollback(&id).await?;
    Ok(Json(RollbackResponse {
        message: "Rollback completed successfully".to_string(),
        source_deployment: outcome.source,
        new_deployment: outcome.new,
    }))
}

/// POST /reset
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, AppError> {
    let outcome = state.deployment_service.reset().await?;
    Ok(Json(ResetResponse {
        message: "System reset completed".to_string(),
        deleted_count: outcome.deployments_removed,
        status: "clean".to_string(),
    }))
}
