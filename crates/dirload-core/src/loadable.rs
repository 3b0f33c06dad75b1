//! Caching loader over a directory listing
//!
//! [`LoadableDirectory`] pairs a [`DirectoryListing`] with an
//! [`EntryLoader`] and caches every successfully loaded value by its
//! resolved path. Cached values outlive the files they came from: a refresh
//! that drops a path from the listing leaves its cache entry in place.

use crate::diagnostics::{ErrorKind, ErrorRecord, LoadError, LoadResult};
use crate::fs::FileSystem;
use crate::listing::DirectoryListing;
use crate::loaders::EntryLoader;
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct LoadableDirectory<T, L> {
    listing: DirectoryListing,
    loader: L,
    loaded_entry_map: RwLock<BTreeMap<PathBuf, T>>,
}

impl<T, L> LoadableDirectory<T, L>
where
    T: Clone,
    L: EntryLoader<T>,
{
    /// Create a loadable directory backed by the real filesystem.
    pub fn new<I, S>(directory: impl AsRef<Path>, extensions: I, loader: L) -> LoadResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_listing(
            DirectoryListing::new(directory, extensions)?,
            loader,
        ))
    }

    pub fn with_fs<I, S>(
        directory: impl AsRef<Path>,
        extensions: I,
        loader: L,
        fs: Arc<dyn FileSystem>,
    ) -> LoadResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_listing(
            DirectoryListing::with_fs(directory, extensions, fs)?,
            loader,
        ))
    }

    pub fn from_listing(listing: DirectoryListing, loader: L) -> Self {
        Self {
            listing,
            loader,
            loaded_entry_map: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    pub fn directory(&self) -> &Path {
        self.listing.directory()
    }

    pub fn supported_extensions(&self) -> BTreeSet<String> {
        self.listing.supported_extensions()
    }

    pub fn file_paths(&self) -> BTreeSet<PathBuf> {
        self.listing.file_paths()
    }

    pub fn load_errors(&self) -> BTreeMap<PathBuf, LoadError> {
        self.listing.load_errors()
    }

    /// Error map entries in path order, ready for display or serialization.
    pub fn error_records(&self) -> Vec<ErrorRecord> {
        self.listing
            .load_errors()
            .into_iter()
            .map(|(path, error)| ErrorRecord::new(path, &error))
            .collect()
    }

    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        self.listing.resolve(file)
    }

    pub fn file_location_error(&self, file: impl AsRef<Path>) -> Option<LoadError> {
        self.listing.file_location_error(file)
    }

    pub async fn refresh_listing(&self) -> LoadResult<()> {
        self.listing.refresh_listing().await
    }

    /// Copy of the cache, keyed by resolved path.
    pub fn loaded_entries(&self) -> BTreeMap<PathBuf, T> {
        self.loaded_entry_map.read().clone()
    }

    /// Cached values in path order.
    pub fn loaded_values(&self) -> Vec<T> {
        self.loaded_entry_map.read().values().cloned().collect()
    }

    pub fn loaded_entry(&self, file: impl AsRef<Path>) -> Option<T> {
        let path = self.listing.resolve(file);
        self.loaded_entry_map.read().get(&path).cloned()
    }

    /// Refresh the listing, then validate and load a single file.
    ///
    /// Validation and load failures are recorded in the error map under the
    /// resolved path before being returned. The cache only changes when the
    /// load succeeds.
    pub async fn load_entry(&self, file: impl AsRef<Path>) -> LoadResult<T> {
        self.listing.refresh_listing().await?;
        self.load_from_snapshot(file.as_ref()).await
    }

    /// Refresh once, then load every listed file concurrently.
    ///
    /// Never fails: individual errors, including a listing failure, are only
    /// visible through [`load_errors`](Self::load_errors).
    pub async fn load_all_entries(&self) {
        if self.listing.refresh_listing().await.is_err() {
            return;
        }

        let paths = self.listing.file_paths();
        let results = join_all(paths.iter().map(|path| self.load_from_snapshot(path))).await;

        let failed = results.iter().filter(|result| result.is_err()).count();
        debug!(
            directory = %self.listing.directory().display(),
            loaded = results.len() - failed,
            failed,
            "bulk load finished"
        );
    }

    async fn load_from_snapshot(&self, file: &Path) -> LoadResult<T> {
        let path = self.listing.resolve(file);

        if let Some(error) = self.listing.file_location_error(&path) {
            self.listing.record_error(path, error.clone());
            return Err(error);
        }

        match self.loader.load(self.listing.fs(), &path).await {
            Ok(value) => {
                debug!(path = %path.display(), "loaded entry");
                self.loaded_entry_map.write().insert(path, value.clone());
                Ok(value)
            }
            Err(error) => {
                // A listed file that fails to load is always a load failure
                let error = if error.kind() == ErrorKind::LoadFailure {
                    error
                } else {
                    LoadError::load(&path, error)
                };
                self.listing.record_error(path, error.clone());
                Err(error)
            }
        }
    }
}
