//! Lexical path helpers
//!
//! Nothing here touches the filesystem: normalization resolves `.` and `..`
//! segments textually, so symlinks inside a path are not followed.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components.
///
/// Trailing separators disappear because only components are kept. A `..`
/// at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Returns the extension of `path` with its leading dot (`.json`), if any.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

/// Case-sensitive check of `path`'s extension against a set of dotted extensions.
pub fn has_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    dotted_extension(path).is_some_and(|ext| extensions.contains(&ext))
}
