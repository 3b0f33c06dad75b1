//! TOML loader

use super::EntryLoader;
use crate::diagnostics::{LoadError, LoadResult};
use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use crate::fs::FileSystem;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::Path;

/// Parse TOML content read from `path`
pub fn parse_toml<T: DeserializeOwned>(path: &Path, content: &str) -> LoadResult<T> {
    ::toml::from_str(content).map_err(|e| LoadError::parse(path, "TOML", e))
}

/// Deserializes each file as TOML into `T`.
#[derive(Debug)]
pub struct TomlLoader<T> {
    max_file_size: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TomlLoader<T> {
    pub fn new() -> Self {
        Self::with_max_file_size(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self {
            max_file_size,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TomlLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> EntryLoader<T> for TomlLoader<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn load(&self, fs: &dyn FileSystem, path: &Path) -> LoadResult<T> {
        let content = fs.read_to_string_with_limit(path, self.max_file_size).await?;
        parse_toml(path, &content)
    }
}
