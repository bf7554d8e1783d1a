//! Safe ZIP archive extraction.
//!
//! Entry names come from an untrusted upload, so every entry is checked
//! against the destination boundary before anything touches the disk.
//! Unsafe entries are skipped rather than failing the whole archive: one
//! malicious entry must not block legitimate content.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use sitehost_core::error::{AppError, ErrorKind};
use sitehost_core::result::AppResult;

use crate::sandbox;

/// Buffer size for copying entry contents.
const BUFFER_SIZE: usize = 64 * 1024;

/// Extract a ZIP archive into `dest`, creating it if needed.
///
/// A container that cannot be opened fails fast with
/// [`ErrorKind::MalformedArchive`]; an I/O failure while writing an entry
/// aborts with [`ErrorKind::Extraction`]. Cleaning up a partially written
/// destination is the caller's responsibility.
///
/// The zip codec is synchronous; async callers should run this through
/// `tokio::task::spawn_blocking`.
pub fn extract(archive: &[u8], dest: &Path) -> AppResult<()> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(|e| {
        AppError::with_source(
            ErrorKind::MalformedArchive,
            "Uploaded file is not a readable ZIP archive",
            e,
        )
    })?;

    fs::create_dir_all(dest).map_err(|e| {
        AppError::with_source(
            ErrorKind::Extraction,
            format!("Failed to create destination: {}", dest.display()),
            e,
        )
    })?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| {
            AppError::with_source(
                ErrorKind::MalformedArchive,
                format!("Corrupt archive entry at index {index}"),
                e,
            )
        })?;

        let raw_name = entry.name().to_string();

        // enclosed_name rejects absolute paths and traversal; confine
        // re-checks containment against the actual destination.
        if entry.enclosed_name().is_none() {
            warn!(entry = %raw_name, "Skipping unsafe archive entry");
            continue;
        }
        let Some(out_path) = sandbox::confine(dest, &raw_name) else {
            warn!(entry = %raw_name, "Skipping archive entry escaping destination");
            continue;
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Extraction,
                    format!("Failed to create directory: {}", out_path.display()),
                    e,
                )
            })?;
            apply_unix_mode(&out_path, entry.unix_mode());
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Extraction,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        write_entry(&mut entry, &out_path)?;
        apply_unix_mode(&out_path, entry.unix_mode());

        debug!(entry = %raw_name, "Extracted archive entry");
    }

    Ok(())
}

/// Write a single entry's bytes fully before the next entry is processed.
fn write_entry(entry: &mut impl Read, out_path: &Path) -> AppResult<()> {
    let mut out_file = File::create(out_path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Extraction,
            format!("Failed to create file: {}", out_path.display()),
            e,
        )
    })?;

    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let n = entry.read(&mut buffer).map_err(|e| {
            AppError::with_source(
                ErrorKind::Extraction,
                format!("Failed to read archive entry for {}", out_path.display()),
                e,
            )
        })?;
        if n == 0 {
            break;
        }
        out_file.write_all(&buffer[..n]).map_err(|e| {
            AppError::with_source(
                ErrorKind::Extraction,
                format!("Failed to write file: {}", out_path.display()),
                e,
            )
        })?;
    }

    Ok(())
}

/// Apply the entry's declared unix mode, where the platform supports it.
#[cfg(unix)]
fn apply_unix_mode(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
    }
}

#[cfg(not(unix))]
fn apply_unix_mode(_path: &Path, _mode: Option<u32>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(IoCursor::new(Vec::new()));
        for (name, content) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_simple_site() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("site");
        let archive = build_zip(&[
            ("index.html", b"<h1>hi</h1>".as_slice()),
            ("css/", b"".as_slice()),
            ("css/style.css", b"body {}".as_slice()),
        ]);

        extract(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("index.html")).unwrap(), b"<h1>hi</h1>");
        assert_eq!(fs::read(dest.join("css/style.css")).unwrap(), b"body {}");
    }

    #[test]
    fn test_traversal_entries_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("site");
        let archive = build_zip(&[
            ("../evil.txt", b"pwned".as_slice()),
            ("index.html", b"safe".as_slice()),
            ("a/../../evil2.txt", b"pwned".as_slice()),
        ]);

        extract(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("index.html")).unwrap(), b"safe");
        assert!(!dir.path().join("evil.txt").exists());
        assert!(!dir.path().join("evil2.txt").exists());
    }

    #[test]
    fn test_nothing_written_outside_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("inner").join("site");
        let archive = build_zip(&[
            ("ok.txt", b"ok".as_slice()),
            ("../escape.txt", b"no".as_slice()),
        ]);

        extract(&archive, &dest).unwrap();

        // Only the destination itself exists under the sandbox root
        assert!(dest.join("ok.txt").exists());
        assert!(!dir.path().join("inner").join("escape.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_malformed_archive_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("site");

        let err = extract(b"this is not a zip file", &dest).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArchive);
    }

    #[test]
    fn test_parent_directories_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("site");
        // File entry with no preceding directory entry
        let archive = build_zip(&[("deep/nested/dir/file.txt", b"x".as_slice())]);

        extract(&archive, &dest).unwrap();
        assert_eq!(fs::read(dest.join("deep/nested/dir/file.txt")).unwrap(), b"x");
    }
}
