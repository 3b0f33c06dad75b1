//! Safe file reading utilities
//!
//! Provides hardened file reading with symlink rejection, regular file checks,
//! and size limits so a listed entry cannot redirect a load elsewhere or
//! exhaust memory.
//!
//! ## Security Model
//!
//! This module uses `symlink_metadata()` to check file properties without
//! following symlinks. It then verifies the file is a regular file (not a
//! directory, FIFO, socket, or device) before reading.
//!
//! Note: There is an inherent TOCTOU (time-of-check-time-of-use) window
//! between the metadata check and the read. Closing it would require
//! platform-specific APIs (O_NOFOLLOW, etc.).

use crate::diagnostics::{LoadError, LoadResult};
use std::path::Path;
use tokio::fs;

/// Default maximum file size (1 MiB = 1,048,576 bytes = 2^20 bytes)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Safely read a file with security checks.
///
/// This function:
/// 1. Rejects symlinks (uses `symlink_metadata` to detect without following)
/// 2. Rejects non-regular files (directories, FIFOs, sockets, devices)
/// 3. Enforces a maximum file size limit (files at exactly the limit are accepted)
///
/// # Errors
///
/// Returns `LoadError::FileSymlink` if the path is a symlink.
/// Returns `LoadError::FileNotRegular` if the path is not a regular file.
/// Returns `LoadError::FileTooBig` if the file exceeds the size limit.
/// Returns `LoadError::FileRead` for other I/O errors.
pub async fn safe_read_file(path: &Path) -> LoadResult<String> {
    safe_read_file_with_limit(path, DEFAULT_MAX_FILE_SIZE).await
}

/// Safely read a file with a custom size limit.
///
/// See [`safe_read_file`] for details on security checks.
pub async fn safe_read_file_with_limit(path: &Path, max_size: u64) -> LoadResult<String> {
    let metadata = fs::symlink_metadata(path)
        .await
        .map_err(|e| LoadError::file_read(path, e))?;

    if metadata.file_type().is_symlink() {
        return Err(LoadError::FileSymlink {
            path: path.to_path_buf(),
        });
    }

    if !metadata.is_file() {
        return Err(LoadError::FileNotRegular {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size > max_size {
        return Err(LoadError::FileTooBig {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::file_read(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_normal_file_read_succeeds() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.json");
        std::fs::write(&file_path, "{\"a\": 1}").unwrap();

        let result = safe_read_file(&file_path).await;
        assert_eq!(result.unwrap(), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_empty_file_read_succeeds() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("empty.txt");
        std::fs::write(&file_path, "").unwrap();

        assert_eq!(safe_read_file(&file_path).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_nonexistent_file_returns_error() {
        let result = safe_read_file(Path::new("/nonexistent/path/file.txt")).await;
        assert!(matches!(result.unwrap_err(), LoadError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_file_at_exact_limit_succeeds() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("exact.txt");
        std::fs::write(&file_path, vec![b'x'; 512]).unwrap();

        assert!(safe_read_file_with_limit(&file_path, 512).await.is_ok());
    }

    #[tokio::test]
    async fn test_file_one_byte_over_limit_rejected() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("over.txt");
        std::fs::write(&file_path, vec![b'x'; 513]).unwrap();

        match safe_read_file_with_limit(&file_path, 512).await.unwrap_err() {
            LoadError::FileTooBig { size, limit, .. } => {
                assert_eq!(size, 513);
                assert_eq!(limit, 512);
            }
            other => panic!("Expected FileTooBig error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_directory_rejected() {
        let temp = TempDir::new().unwrap();
        let dir_path = temp.path().join("subdir");
        std::fs::create_dir(&dir_path).unwrap();

        let result = safe_read_file(&dir_path).await;
        assert!(matches!(
            result.unwrap_err(),
            LoadError::FileNotRegular { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_read_error() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("binary.txt");
        std::fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let result = safe_read_file(&file_path).await;
        assert!(matches!(result.unwrap_err(), LoadError::FileRead { .. }));
    }

    #[cfg(unix)]
    mod unix_tests {
        use super::*;
        use std::os::unix::fs::symlink;

        #[tokio::test]
        async fn test_symlink_rejected() {
            let temp = TempDir::new().unwrap();
            let target_path = temp.path().join("target.json");
            let link_path = temp.path().join("link.json");

            std::fs::write(&target_path, "{}").unwrap();
            symlink(&target_path, &link_path).unwrap();

            match safe_read_file(&link_path).await.unwrap_err() {
                LoadError::FileSymlink { path } => assert_eq!(path, link_path),
                other => panic!("Expected FileSymlink error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_dangling_symlink_rejected() {
            let temp = TempDir::new().unwrap();
            let link_path = temp.path().join("dangling.json");
            symlink("/nonexistent/target", &link_path).unwrap();

            let result = safe_read_file(&link_path).await;
            assert!(matches!(result.unwrap_err(), LoadError::FileSymlink { .. }));
        }
    }
}
