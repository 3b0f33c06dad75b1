//! # dirload-core
//!
//! Directory-scoped file inventory and a generic caching loader.
//!
//! - [`DirectoryListing`] snapshots the regular files directly inside one
//!   absolute directory whose extension is in a configured set, and validates
//!   paths against that snapshot.
//! - [`LoadableDirectory`] loads listed files through an [`EntryLoader`],
//!   caches the values by resolved path and records per-file errors.
//!
//! ```rust,ignore
//! use dirload_core::{loaders::JsonLoader, LoadableDirectory};
//!
//! let dir: LoadableDirectory<serde_json::Value, _> =
//!     LoadableDirectory::new("/srv/plugins", [".json"], JsonLoader::new())?;
//! dir.load_all_entries().await;
//! for (path, error) in dir.load_errors() {
//!     eprintln!("{}: {}", path.display(), error);
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod file_utils;
pub mod fs;
pub mod listing;
pub mod loadable;
pub mod loaders;
pub mod paths;

pub use config::{LoadFormat, LoaderConfig};
pub use diagnostics::{ErrorKind, ErrorRecord, LoadError, LoadResult};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use listing::DirectoryListing;
pub use loadable::LoadableDirectory;
pub use loaders::EntryLoader;
