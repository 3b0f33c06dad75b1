//! Directory listing and path validation
//!
//! A [`DirectoryListing`] owns one absolute directory and a set of accepted
//! extensions. `refresh_listing` takes a snapshot of the matching regular
//! files directly inside the directory; `file_location_error` validates a
//! path against that snapshot without touching the filesystem, so a file
//! created or removed after the last refresh is not seen until the next one.

use crate::diagnostics::{LoadError, LoadResult};
use crate::fs::{FileSystem, RealFileSystem};
use crate::paths::{has_extension, normalize_path};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DirectoryListing {
    directory: PathBuf,
    supported_extensions: BTreeSet<String>,
    file_paths: RwLock<BTreeSet<PathBuf>>,
    load_error_map: RwLock<BTreeMap<PathBuf, LoadError>>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryListing")
            .field("directory", &self.directory)
            .field("supported_extensions", &self.supported_extensions)
            .field("file_paths", &*self.file_paths.read())
            .field("errors", &self.load_error_map.read().len())
            .finish()
    }
}

impl DirectoryListing {
    /// Create a listing backed by the real filesystem.
    pub fn new<I, S>(directory: impl AsRef<Path>, extensions: I) -> LoadResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_fs(directory, extensions, Arc::new(RealFileSystem))
    }

    /// Create a listing over an arbitrary [`FileSystem`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `directory` is not absolute or an extension does
    /// not start with a dot.
    pub fn with_fs<I, S>(
        directory: impl AsRef<Path>,
        extensions: I,
        fs: Arc<dyn FileSystem>,
    ) -> LoadResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directory = directory.as_ref();
        if !directory.is_absolute() {
            return Err(LoadError::invalid_argument(format!(
                "directory must be an absolute path: {}",
                directory.display()
            )));
        }

        let supported_extensions: BTreeSet<String> =
            extensions.into_iter().map(Into::into).collect();
        if let Some(bad) = supported_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(LoadError::invalid_argument(format!(
                "extension must start with '.': {bad:?}"
            )));
        }

        Ok(Self {
            directory: normalize_path(directory),
            supported_extensions,
            file_paths: RwLock::new(BTreeSet::new()),
            load_error_map: RwLock::new(BTreeMap::new()),
            fs,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn supported_extensions(&self) -> BTreeSet<String> {
        self.supported_extensions.clone()
    }

    /// Snapshot taken by the last successful refresh.
    pub fn file_paths(&self) -> BTreeSet<PathBuf> {
        self.file_paths.read().clone()
    }

    /// Errors recorded since the last refresh began.
    pub fn load_errors(&self) -> BTreeMap<PathBuf, LoadError> {
        self.load_error_map.read().clone()
    }

    pub(crate) fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub(crate) fn record_error(&self, path: PathBuf, error: LoadError) {
        warn!(path = %path.display(), kind = %error.kind(), "{}", error.detailed_message());
        self.load_error_map.write().insert(path, error);
    }

    /// Re-scan the directory and replace the snapshot.
    ///
    /// Clears the error map first. On a listing failure the error is recorded
    /// under the directory path and returned; the previous snapshot is kept.
    pub async fn refresh_listing(&self) -> LoadResult<()> {
        self.load_error_map.write().clear();

        let entries = match self.fs.read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) => {
                let error = LoadError::directory_access(&self.directory, e);
                self.record_error(self.directory.clone(), error.clone());
                return Err(error);
            }
        };

        let file_paths: BTreeSet<PathBuf> = entries
            .into_iter()
            .filter(|entry| entry.metadata.is_file && !entry.metadata.is_symlink)
            .filter(|entry| has_extension(&entry.path, &self.supported_extensions))
            .map(|entry| self.directory.join(entry.path.file_name().unwrap_or_default()))
            .collect();

        debug!(
            directory = %self.directory.display(),
            files = file_paths.len(),
            "refreshed listing"
        );
        *self.file_paths.write() = file_paths;
        Ok(())
    }

    /// Map `file` to an absolute normalized path inside the directory's frame.
    ///
    /// Relative inputs are joined onto the directory. Never touches the
    /// filesystem; `resolve(resolve(x)) == resolve(x)`.
    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        let file = file.as_ref();
        if file.is_absolute() {
            normalize_path(file)
        } else {
            normalize_path(&self.directory.join(file))
        }
    }

    /// Validate `file` against the last snapshot.
    ///
    /// Returns `OutOfScope` when the resolved path is not a direct child of the
    /// directory and `NotFound` when it is not in the snapshot.
    pub fn file_location_error(&self, file: impl AsRef<Path>) -> Option<LoadError> {
        let path = self.resolve(file);

        if path.parent() != Some(self.directory.as_path()) {
            return Some(LoadError::OutOfScope {
                path,
                directory: self.directory.clone(),
            });
        }

        if !self.file_paths.read().contains(&path) {
            return Some(LoadError::NotFound { path });
        }

        None
    }
}
