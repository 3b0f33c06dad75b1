//! Content loaders
//!
//! An [`EntryLoader`] turns one validated file into a value. The loadable
//! directory only depends on this capability; the bundled loaders read text
//! through the [`FileSystem`] and optionally deserialize it with serde.

pub mod json;
pub mod text;
pub mod toml;
pub mod yaml;

use crate::diagnostics::LoadResult;
use crate::fs::FileSystem;
use async_trait::async_trait;
use std::path::Path;

pub use json::JsonLoader;
pub use text::TextLoader;
pub use self::toml::TomlLoader;
pub use yaml::YamlLoader;

/// Strategy that produces a `T` from a file already validated against the listing.
#[async_trait]
pub trait EntryLoader<T>: Send + Sync {
    async fn load(&self, fs: &dyn FileSystem, path: &Path) -> LoadResult<T>;
}
