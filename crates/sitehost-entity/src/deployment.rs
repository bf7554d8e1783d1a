//! Deployment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded-and-extracted static site.
///
/// The `id` doubles as the public URL namespace segment and the name of
/// the directory holding the extracted tree. Ids are generated once at
/// creation and never reused, even after deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deployment {
    /// Unique deployment identifier (hyphenated UUIDv4).
    pub id: String,
    /// The uploaded archive's declared filename.
    pub filename: String,
    /// When the deployment was created.
    pub timestamp: DateTime<Utc>,
    /// Directory containing the extracted file tree.
    pub path: String,
}

impl Deployment {
    /// Create a new deployment record stamped with the current time.
    pub fn new(id: impl Into<String>, filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            timestamp: Utc::now(),
            path: path.into(),
        }
    }

    /// Generate a fresh collision-resistant deployment id.
    ///
    /// Ids are 128-bit random UUIDs, so they are never reused even after
    /// the deployment they named is deleted.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = Deployment::generate_id();
        let b = Deployment::generate_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let d = Deployment::new(Deployment::generate_id(), "site.zip", "deployments/x");
        let value = serde_json::to_value(&d).unwrap();
        assert!(value.get("id").is_some());
        assert!(value.get("filename").is_some());
        assert!(value.get("timestamp").is_some());
        assert!(value.get("path").is_some());
        // chrono serializes DateTime<Utc> as RFC3339
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'));
    }
}
