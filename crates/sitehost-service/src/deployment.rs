//! Deployment lifecycle service — upload, list, delete, rollback, reset.
//!
//! Every mutating operation keeps the metadata store and the on-disk
//! deployment tree consistent: the directory is materialized before the
//! record is persisted, and a failed persist tears the directory back
//! down so no orphaned files survive a half-finished upload.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tokio::fs;
use tracing::{info, warn};

use sitehost_core::config::StorageConfig;
use sitehost_core::error::{AppError, ErrorKind};
use sitehost_core::result::AppResult;
use sitehost_database::repositories::deployment::DeploymentRepository;
use sitehost_entity::deployment::Deployment;
use sitehost_storage::copy::copy_dir_recursive;
use sitehost_storage::extractor;

/// Orchestrates deployment creation and removal across the metadata
/// store and the deployments directory.
#[derive(Clone)]
pub struct DeploymentService {
    /// Deployment metadata repository.
    repo: Arc<DeploymentRepository>,
    /// Root directory holding one subdirectory per deployment.
    root: PathBuf,
    /// Maximum accepted archive size in bytes.
    max_archive_bytes: u64,
}

impl std::fmt::Debug for DeploymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentService")
            .field("root", &self.root)
            .finish()
    }
}

/// Parameters for deploying an uploaded archive.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Original archive filename as sent by the client.
    pub filename: String,
    /// Raw ZIP archive bytes.
    pub data: Bytes,
}

/// Result of deleting a single deployment.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// The record that was removed.
    pub deployment: Deployment,
    /// Set when the metadata row was removed but the directory was not.
    pub cleanup_warning: Option<String>,
}

/// Result of deleting every deployment.
#[derive(Debug, Clone)]
pub enum PurgeOutcome {
    /// There was nothing to delete.
    Empty,
    /// Deployments were removed.
    Purged {
        /// The records that were removed.
        deployments: Vec<Deployment>,
        /// Directories that could not be removed from disk.
        failed_paths: Vec<String>,
    },
}

/// Result of rolling back to an earlier deployment.
#[derive(Debug, Clone)]
pub struct RollbackOutcome {
    /// The deployment that was rolled back to, untouched.
    pub source: Deployment,
    /// The new deployment created from the source's files.
    pub new: Deployment,
}

/// Result of a factory reset.
#[derive(Debug, Clone)]
pub struct ResetOutcome {
    /// Number of deployments that existed before the reset.
    pub deployments_removed: u64,
}

impl DeploymentService {
    /// Creates a new deployment service.
    pub fn new(repo: Arc<DeploymentRepository>, config: &StorageConfig) -> Self {
        Self {
            repo,
            root: PathBuf::from(&config.deployments_root),
            max_archive_bytes: config.max_upload_size_bytes,
        }
    }

    /// Root directory holding the extracted deployments.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Deploys an uploaded ZIP archive.
    ///
    /// Extracts the archive into a fresh directory named after a newly
    /// generated deployment id, then persists the metadata record. If
    /// extraction or persistence fails the directory is removed again.
    pub async fn create(&self, params: UploadParams) -> AppResult<Deployment> {
        if params.filename.is_empty() {
            return Err(AppError::validation("Uploaded file has no filename"));
        }
        if params.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if params.data.len() as u64 > self.max_archive_bytes {
            return Err(AppError::validation(format!(
                "Archive exceeds maximum upload size of {} bytes",
                self.max_archive_bytes
            )));
        }

        let id = Deployment::generate_id();
        let dest = self.root.join(&id);

        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create deployments root", e)
        })?;

        let data = params.data.clone();
        let extract_dest = dest.clone();
        let extracted = tokio::task::spawn_blocking(move || extractor::extract(&data, &extract_dest))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Extraction task failed", e))?;

        if let Err(e) = extracted {
            self.remove_site_dir(&dest).await;
            return Err(e);
        }

        let deployment = Deployment::new(&id, &params.filename, dest.to_string_lossy());

        if let Err(e) = self.repo.create(&deployment).await {
            self.remove_site_dir(&dest).await;
            return Err(e);
        }

        info!(
            deployment_id = %deployment.id,
            filename = %deployment.filename,
            "Deployment created"
        );
        Ok(deployment)
    }

    /// Lists all deployments, newest first.
    pub async fn list(&self) -> AppResult<Vec<Deployment>> {
        self.repo.list().await
    }

    /// Looks up a single deployment by id.
    pub async fn find(&self, id: &str) -> AppResult<Option<Deployment>> {
        self.repo.find_by_id(id).await
    }

    /// Deletes one deployment: metadata first, then its directory.
    ///
    /// The directory removal is best-effort. A failure there leaves the
    /// files orphaned but unroutable (the metadata row is already gone),
    /// so it is reported as a warning rather than an error.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteOutcome> {
        let deployment = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Deployment not found"))?;

        self.repo.delete(id).await?;

        let cleanup_warning = match fs::remove_dir_all(&deployment.path).await {
            Ok(()) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    deployment_id = %id,
                    path = %deployment.path,
                    error = %e,
                    "Deployment metadata removed but directory cleanup failed"
                );
                Some(format!("Failed to remove deployment files: {e}"))
            }
        };

        info!(deployment_id = %id, "Deployment deleted");
        Ok(DeleteOutcome {
            deployment,
            cleanup_warning,
        })
    }

    /// Deletes every deployment.
    ///
    /// Metadata rows are removed in one sweep, then each recorded
    /// directory is removed best-effort. Paths that fail to delete are
    /// collected and reported, not fatal.
    pub async fn delete_all(&self) -> AppResult<PurgeOutcome> {
        let deployments = self.repo.list().await?;
        if deployments.is_empty() {
            return Ok(PurgeOutcome::Empty);
        }

        let deleted = self.repo.delete_all().await?;

        let mut failed_paths = Vec::new();
        for deployment in &deployments {
            match fs::remove_dir_all(&deployment.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(
                        deployment_id = %deployment.id,
                        path = %deployment.path,
                        error = %e,
                        "Failed to remove deployment directory"
                    );
                    failed_paths.push(deployment.path.clone());
                }
            }
        }

        // Remove the root itself only if it is now empty
        let _ = fs::remove_dir(&self.root).await;

        info!(deleted, "All deployments deleted");
        Ok(PurgeOutcome::Purged {
            deployments,
            failed_paths,
        })
    }

    /// Recreates a past deployment as a new one.
    ///
    /// Copies the source deployment's file tree into a fresh directory
    /// under a new id and persists a new record whose filename carries a
    /// `[ROLLBACK]` marker. The source deployment is left untouched.
    pub async fn rollback(&self, source_id: &str) -> AppResult<RollbackOutcome> {
        let source = self
            .repo
            .find_by_id(source_id)
            .await?
            .ok_or_else(|| AppError::not_found("Source deployment not found"))?;

        let source_path = PathBuf::from(&source.path);
        let exists = fs::try_exists(&source_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to inspect source deployment", e)
        })?;
        if !exists {
            return Err(AppError::not_found(
                "Source deployment files no longer exist",
            ));
        }

        let id = Deployment::generate_id();
        let dest = self.root.join(&id);

        if let Err(e) = copy_dir_recursive(&source_path, &dest).await {
            self.remove_site_dir(&dest).await;
            return Err(e);
        }

        let deployment = Deployment::new(
            &id,
            format!("[ROLLBACK] {}", source.filename),
            dest.to_string_lossy(),
        );

        if let Err(e) = self.repo.create(&deployment).await {
            self.remove_site_dir(&dest).await;
            return Err(e);
        }

        info!(
            source_id = %source_id,
            deployment_id = %deployment.id,
            "Rollback deployment created"
        );
        Ok(RollbackOutcome {
            source,
            new: deployment,
        })
    }

    /// Wipes all deployment state: every metadata row and the entire
    /// deployments directory, which is then recreated empty.
    pub async fn reset(&self) -> AppResult<ResetOutcome> {
        let existing = self.repo.count().await?;
        self.repo.delete_all().await?;

        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    "Failed to remove deployments directory",
                    e,
                ));
            }
        }
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to recreate deployments root", e)
        })?;

        info!(deployments_removed = existing, "System reset");
        Ok(ResetOutcome {
            deployments_removed: existing as u64,
        })
    }

    /// Best-effort removal of a partially created deployment directory.
    async fn remove_site_dir(&self, dest: &std::path::Path) {
        if let Err(e) = fs::remove_dir_all(dest).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %dest.display(), error = %e, "Failed to clean up deployment directory");
            }
        }
    }
}
