//! JSON loader

use super::EntryLoader;
use crate::diagnostics::{LoadError, LoadResult};
use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use crate::fs::FileSystem;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Parse JSON content read from `path`
pub fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> LoadResult<T> {
    serde_json::from_str(content).map_err(|e| LoadError::parse(path, "JSON", e))
}

/// Deserializes each file as JSON into `T`.
pub struct JsonLoader<T> {
    max_file_size: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonLoader<T> {
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

impl<T> Default for JsonLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLoader")
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

#[async_trait]
impl<T> EntryLoader<T> for JsonLoader<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn load(&self, fs: &dyn FileSystem, path: &Path) -> LoadResult<T> {
        let content = fs.read_to_string_with_limit(path, self.max_file_size).await?;
        parse_json(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::fs::MockFileSystem;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Plugin {
        name: String,
        #[serde(default)]
        enabled: bool,
    }

    #[tokio::test]
    async fn test_json_loader_typed() {
        let fs = MockFileSystem::new();
        fs.add_file("/data/p.json", r#"{"name": "alpha", "enabled": true}"#);

        let plugin: Plugin = JsonLoader::new()
            .load(&fs, Path::new("/data/p.json"))
            .await
            .unwrap();
        assert_eq!(
            plugin,
            Plugin {
                name: "alpha".to_string(),
                enabled: true
            }
        );
    }

    #[tokio::test]
    async fn test_json_loader_malformed() {
        let fs = MockFileSystem::new();
        fs.add_file("/data/bad.json", "{ not json");

        let result: LoadResult<serde_json::Value> = JsonLoader::new()
            .load(&fs, Path::new("/data/bad.json"))
            .await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadFailure);
        assert!(matches!(err, LoadError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn test_parse_json_wrong_shape() {
        let result: LoadResult<Plugin> = parse_json(Path::new("/d/x.json"), "[1, 2]");
        assert!(result.is_err());
    }
}
