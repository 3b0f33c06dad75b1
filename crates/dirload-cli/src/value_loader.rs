//! Format-dispatching loader producing JSON values for display

use async_trait::async_trait;
use dirload_core::loaders::{json::parse_json, toml::parse_toml, yaml::parse_yaml};
use dirload_core::{EntryLoader, FileSystem, LoadFormat, LoadResult};
use serde_json::Value;
use std::path::Path;

/// Loads any supported format into a `serde_json::Value`.
///
/// `Auto` is resolved per file from its own extension.
#[derive(Debug, Clone, Copy)]
pub struct ValueLoader {
    format: LoadFormat,
    max_file_size: u64,
}

impl ValueLoader {
    pub fn new(format: LoadFormat, max_file_size: u64) -> Self {
        Self {
            format,
            max_file_size,
        }
    }
}

#[async_trait]
impl EntryLoader<Value> for ValueLoader {
    async fn load(&self, fs: &dyn FileSystem, path: &Path) -> LoadResult<Value> {
        let content = fs.read_to_string_with_limit(path, self.max_file_size).await?;
        let extension = dirload_core::paths::dotted_extension(path);

        match self.format.resolve(extension.as_deref()) {
            LoadFormat::Json => parse_json(path, &content),
            LoadFormat::Yaml => parse_yaml(path, &content),
            LoadFormat::Toml => parse_toml(path, &content),
            LoadFormat::Text | LoadFormat::Auto => Ok(Value::String(content)),
        }
    }
}
