//! Maps public URLs to deployment files on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

use sitehost_core::error::AppError;
use sitehost_core::result::AppResult;

use crate::sandbox;

/// A successfully resolved static file.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Filesystem path of the regular file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, for caching headers.
    pub modified: DateTime<Utc>,
}

/// Resolves `/{deployment-id}/{file-path}` requests against the
/// deployments root.
///
/// The URL remainder is untrusted input even though extraction already
/// sanitized stored names, so confinement is enforced here a second time.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    /// Root directory holding one subdirectory per deployment.
    root: PathBuf,
}

impl StaticResolver {
    /// Create a resolver over the given deployments root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a deployment id plus file path to a regular file on disk.
    ///
    /// Fails with a not-found error for empty segments, paths escaping the
    /// deployments root, missing files, and directories (no index-file
    /// substitution).
    pub async fn resolve(&self, deployment_id: &str, file_path: &str) -> AppResult<ResolvedFile> {
        if deployment_id.is_empty() || file_path.is_empty() {
            return Err(AppError::not_found("File not found"));
        }

        // The id segment is untrusted too; confine it first so the file
        // path cannot escape its own deployment directory.
        let Some(site_root) = sandbox::confine(&self.root, deployment_id) else {
            return Err(AppError::not_found("File not found"));
        };
        let Some(full_path) = sandbox::confine(&site_root, file_path) else {
            return Err(AppError::not_found("File not found"));
        };

        let meta = match fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found("File not found"));
            }
            Err(e) => return Err(e.into()),
        };

        if !meta.is_file() {
            return Err(AppError::not_found("File not found"));
        }

        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(ResolvedFile {
            path: full_path,
            size: meta.len(),
            modified,
        })
    }

    /// The deployments root this resolver serves from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Guess MIME type from a file path extension.
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_resolver() -> (StaticResolver, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site-1");
        fs::create_dir_all(site.join("css")).await.unwrap();
        fs::write(site.join("index.html"), b"<h1>hi</h1>").await.unwrap();
        fs::write(site.join("css/style.css"), b"body {}").await.unwrap();
        fs::write(dir.path().join("secret.txt"), b"outside").await.unwrap();
        (StaticResolver::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn test_resolves_existing_file() {
        let (resolver, _dir) = seeded_resolver().await;

        let resolved = resolver.resolve("site-1", "index.html").await.unwrap();
        assert_eq!(resolved.size, b"<h1>hi</h1>".len() as u64);
        assert!(resolved.path.ends_with("site-1/index.html"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (resolver, _dir) = seeded_resolver().await;
        let err = resolver.resolve("site-1", "missing.html").await.unwrap_err();
        assert_eq!(err.kind, sitehost_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_directories_do_not_resolve() {
        let (resolver, _dir) = seeded_resolver().await;
        assert!(resolver.resolve("site-1", "css").await.is_err());
    }

    #[tokio::test]
    async fn test_traversal_is_not_found_even_when_target_exists() {
        let (resolver, _dir) = seeded_resolver().await;
        // secret.txt exists directly under the root, one level above the site
        assert!(resolver.resolve("site-1", "../secret.txt").await.is_err());
        assert!(resolver.resolve("..", "secret.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_segments_are_not_found() {
        let (resolver, _dir) = seeded_resolver().await;
        assert!(resolver.resolve("", "index.html").await.is_err());
        assert!(resolver.resolve("site-1", "").await.is_err());
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_from_path(Path::new("a/index.html")), Some("text/html"));
        assert_eq!(mime_from_path(Path::new("img.PNG")), Some("image/png"));
        assert_eq!(mime_from_path(Path::new("noext")), None);
    }
}
