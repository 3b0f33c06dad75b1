//! FileSystem abstraction for testability
//!
//! This module provides a `FileSystem` trait covering the two filesystem
//! operations the loader needs: listing a directory (without following
//! symlinks) and reading a file's content.
//!
//! ## Usage
//!
//! For production code, use `RealFileSystem` which delegates to `tokio::fs`
//! and the safe file reading utilities in `file_utils`.
//!
//! For tests, use `MockFileSystem` which provides an in-memory map of entries
//! behind a `RwLock`, so listings and loads can be exercised without temp
//! directories.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dirload_core::fs::{FileSystem, MockFileSystem};
//! use std::path::Path;
//!
//! let mock_fs = MockFileSystem::new();
//! mock_fs.add_dir("/data");
//! mock_fs.add_file("/data/a.json", "{}");
//! let entries = mock_fs.read_dir(Path::new("/data")).await?;
//! assert_eq!(entries.len(), 1);
//! ```

use crate::diagnostics::{LoadError, LoadResult};
use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

/// Metadata information returned by the FileSystem trait.
///
/// This provides a subset of `std::fs::Metadata` that can be mocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Whether this is a regular file
    pub is_file: bool,
    /// Whether this is a symlink
    pub is_symlink: bool,
}

impl FileMetadata {
    /// Create metadata for a regular file
    pub fn file() -> Self {
        Self {
            is_file: true,
            is_symlink: false,
        }
    }

    /// Create metadata for a directory
    pub fn directory() -> Self {
        Self {
            is_file: false,
            is_symlink: false,
        }
    }

    /// Create metadata for a symlink
    pub fn symlink() -> Self {
        Self {
            is_file: false,
            is_symlink: true,
        }
    }
}

impl From<&Metadata> for FileMetadata {
    fn from(meta: &Metadata) -> Self {
        Self {
            is_file: meta.is_file(),
            is_symlink: meta.file_type().is_symlink(),
        }
    }
}

/// Directory entry returned by `read_dir`.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Path to this entry
    pub path: PathBuf,
    /// Metadata for this entry, symlinks not followed
    pub metadata: FileMetadata,
}

/// Trait for abstracting file system operations.
///
/// Must be `Send + Sync` so a single instance can back concurrent loads.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Immediate entries of a directory; symlinks are reported, not followed
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read file contents to string, rejecting symlinks, non-regular files
    /// and files larger than `max_size` bytes
    async fn read_to_string_with_limit(&self, path: &Path, max_size: u64) -> LoadResult<String>;

    /// Read file contents with the default size limit
    async fn read_to_string(&self, path: &Path) -> LoadResult<String> {
        self.read_to_string_with_limit(path, DEFAULT_MAX_FILE_SIZE)
            .await
    }
}

/// Real file system implementation that delegates to `tokio::fs` and `file_utils`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            // Entries removed between listing and stat are skipped
            let Ok(metadata) = tokio::fs::symlink_metadata(&path).await else {
                continue;
            };
            entries.push(DirEntry {
                path,
                metadata: FileMetadata::from(&metadata),
            });
        }

        Ok(entries)
    }

    async fn read_to_string_with_limit(&self, path: &Path, max_size: u64) -> LoadResult<String> {
        crate::file_utils::safe_read_file_with_limit(path, max_size).await
    }
}

/// Mock entry type for the in-memory file system.
#[derive(Debug, Clone)]
enum MockEntry {
    File { content: String },
    Directory,
    Symlink,
}

impl MockEntry {
    fn metadata(&self) -> FileMetadata {
        match self {
            MockEntry::File { .. } => FileMetadata::file(),
            MockEntry::Directory => FileMetadata::directory(),
            MockEntry::Symlink => FileMetadata::symlink(),
        }
    }
}

/// Mock file system for testing.
///
/// Directories must be added explicitly; files added under a path that was
/// never registered as a directory are invisible to `read_dir` of that path.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    entries: RwLock<HashMap<PathBuf, MockEntry>>,
}

impl MockFileSystem {
    /// Create a new empty mock file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = normalize_mock_path(path.as_ref());
        self.entries.write().insert(
            path,
            MockEntry::File {
                content: content.into(),
            },
        );
    }

    /// Add a directory
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize_mock_path(path.as_ref());
        self.entries.write().insert(path, MockEntry::Directory);
    }

    /// Add a symlink entry; the target is never followed
    pub fn add_symlink(&self, path: impl AsRef<Path>) {
        let path = normalize_mock_path(path.as_ref());
        self.entries.write().insert(path, MockEntry::Symlink);
    }

    /// Remove an entry
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = normalize_mock_path(path.as_ref());
        self.entries.write().remove(&path);
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn get_entry(&self, path: &Path) -> Option<MockEntry> {
        let path = normalize_mock_path(path);
        self.entries.read().get(&path).cloned()
    }
}

/// Normalize a path for mock file system storage.
/// Converts backslashes to forward slashes for cross-platform consistency.
fn normalize_mock_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(path_str.replace('\\', "/"))
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path_normalized = normalize_mock_path(path);

        match self.get_entry(&path_normalized) {
            Some(MockEntry::Directory) => {}
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    "not a directory",
                ));
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "directory not found",
                ));
            }
        }

        let prefix = if path_normalized.to_string_lossy().ends_with('/') {
            path_normalized.to_string_lossy().to_string()
        } else {
            format!("{}/", path_normalized.display())
        };

        let entries = self.entries.read();
        let result = entries
            .iter()
            .filter(|(entry_path, _)| {
                // Direct children only
                entry_path
                    .to_string_lossy()
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|(entry_path, entry)| DirEntry {
                path: entry_path.clone(),
                metadata: entry.metadata(),
            })
            .collect();

        Ok(result)
    }

    async fn read_to_string_with_limit(&self, path: &Path, max_size: u64) -> LoadResult<String> {
        match self.get_entry(path) {
            None => Err(LoadError::file_read(
                path,
                io::Error::new(io::ErrorKind::NotFound, "file not found"),
            )),
            Some(MockEntry::Directory) => Err(LoadError::FileNotRegular {
                path: path.to_path_buf(),
            }),
            Some(MockEntry::Symlink) => Err(LoadError::FileSymlink {
                path: path.to_path_buf(),
            }),
            Some(MockEntry::File { content }) => {
                let size = content.len() as u64;
                if size > max_size {
                    return Err(LoadError::FileTooBig {
                        path: path.to_path_buf(),
                        size,
                        limit: max_size,
                    });
                }
                Ok(content)
            }
        }
    }
}
