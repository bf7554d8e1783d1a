//! Recursive directory copy for rollback.

use std::path::{Path, PathBuf};

use tokio::fs;

use sitehost_core::error::{AppError, ErrorKind};
use sitehost_core::result::AppResult;

/// Recursively copy a directory tree, returning the number of files copied.
///
/// `fs::copy` carries the source permission bits, so per-file permissions
/// survive the copy. Symlinks are not followed into; a deployment tree
/// produced by the extractor never contains them.
pub async fn copy_dir_recursive(src: &Path, dst: &Path) -> AppResult<u64> {
    let mut files_copied = 0u64;
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((cur_src, cur_dst)) = pending.pop() {
        fs::create_dir_all(&cur_dst).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", cur_dst.display()),
                e,
            )
        })?;

        let mut entries = fs::read_dir(&cur_src).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read directory: {}", cur_src.display()),
                e,
            )
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_src = entry.path();
            let entry_dst = cur_dst.join(entry.file_name());

            let file_type = entry.file_type().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry type", e)
            })?;

            if file_type.is_dir() {
                pending.push((entry_src, entry_dst));
            } else {
                fs::copy(&entry_src, &entry_dst).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!(
                            "Failed to copy {} -> {}",
                            entry_src.display(),
                            entry_dst.display()
                        ),
                        e,
                    )
                })?;
                files_copied += 1;
            }
        }
    }

    Ok(files_copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_preserves_tree_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");

        fs::create_dir_all(src.join("css")).await.unwrap();
        fs::write(src.join("index.html"), b"<h1>hi</h1>").await.unwrap();
        fs::write(src.join("css/style.css"), b"body {}").await.unwrap();

        let copied = copy_dir_recursive(&src, &dst).await.unwrap();
        assert_eq!(copied, 2);

        assert_eq!(
            fs::read(dst.join("index.html")).await.unwrap(),
            b"<h1>hi</h1>"
        );
        assert_eq!(fs::read(dst.join("css/style.css")).await.unwrap(), b"body {}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");

        fs::create_dir_all(&src).await.unwrap();
        fs::write(src.join("run.sh"), b"#!/bin/sh\n").await.unwrap();
        fs::set_permissions(src.join("run.sh"), std::fs::Permissions::from_mode(0o755))
            .await
            .unwrap();

        copy_dir_recursive(&src, &dst).await.unwrap();

        let mode = fs::metadata(dst.join("run.sh"))
            .await
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn test_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_dir_recursive(&dir.path().join("nope"), &dir.path().join("dst"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
