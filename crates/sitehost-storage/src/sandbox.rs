//! Path confinement for untrusted names.
//!
//! Untrusted path strings reach the filesystem twice: as archive entry
//! names at extraction time and as URL remainders at resolution time.
//! Both go through [`confine`] so the containment rule is enforced
//! identically in both places.

use std::path::{Component, Path, PathBuf};

/// Resolve an untrusted relative path strictly inside `root`.
///
/// Normalizes the path lexically (no filesystem access, so confinement
/// holds even for paths that do not exist yet) and returns `None` when
/// the input is absolute, resolves to the root itself, or would escape
/// the root through parent-directory segments.
pub fn confine(root: &Path, untrusted: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(untrusted).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if depth == 0 { None } else { Some(resolved) }
}
