//! Deployment repository implementation.
//!
//! The metadata store is the source of truth for which deployments
//! exist; the filesystem side is reconciled by the service layer.

use sqlx::SqlitePool;

use sitehost_core::error::{AppError, ErrorKind};
use sitehost_core::result::AppResult;
use sitehost_entity::Deployment;

/// Repository for deployment metadata CRUD.
#[derive(Debug, Clone)]
pub struct DeploymentRepository {
    pool: SqlitePool,
}

impl DeploymentRepository {
    /// Create a new deployment repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new deployment record.
    ///
    /// Fails with a conflict error if the id already exists; callers are
    /// expected to pre-generate collision-resistant ids.
    pub async fn create(&self, deployment: &Deployment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO deployments (id, filename, timestamp, path) VALUES ($1, $2, $3, $4)",
        )
        .bind(&deployment.id)
        .bind(&deployment.filename)
        .bind(deployment.timestamp)
        .bind(&deployment.path)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::conflict(format!("Deployment {} already exists", deployment.id))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert deployment", e)
            }
        })?;
        Ok(())
    }

    /// Find a deployment by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Deployment>> {
        sqlx::query_as::<_, Deployment>(
            "SELECT id, filename, timestamp, path FROM deployments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find deployment", e))
    }

    /// List all deployments, newest first.
    ///
    /// Ties on the timestamp are broken by insertion order (rowid), so the
    /// ordering is stable across identical creation times.
    pub async fn list(&self) -> AppResult<Vec<Deployment>> {
        sqlx::query_as::<_, Deployment>(
            "SELECT id, filename, timestamp, path FROM deployments \
             ORDER BY timestamp DESC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list deployments", e))
    }

    /// Delete a deployment record, returning the number of rows affected.
    ///
    /// A missing id is a zero-row no-op, not an error; the caller decides
    /// whether that constitutes a 404.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM deployments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete deployment", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Delete all deployment records, returning the number of rows affected.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM deployments")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete deployments", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Count deployment records.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM deployments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count deployments", e)
            })
    }
}
