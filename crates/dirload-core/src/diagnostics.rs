//! Error types and error reporting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Boxed parser error shared between error-map copies.
pub type SharedSource = Arc<dyn std::error::Error + Send + Sync>;

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Bad constructor or configuration input
    InvalidArgument,
    /// The managed directory itself could not be listed
    DirectoryAccess,
    /// A path that is not a direct child of the managed directory
    OutOfScope,
    /// A path missing from the current listing snapshot
    NotFound,
    /// The content step failed for a listed file
    LoadFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::DirectoryAccess => "directory-access",
            ErrorKind::OutOfScope => "out-of-scope",
            ErrorKind::NotFound => "not-found",
            ErrorKind::LoadFailure => "load-failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing and loading errors.
///
/// Errors are `Clone` because the same value is returned to the caller and
/// kept in the error map; underlying sources are reference counted.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("failed to read directory: {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("{path} is not a direct child of {directory}")]
    OutOfScope { path: PathBuf, directory: PathBuf },

    #[error("file not found in listing: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("refusing to read symlink: {path}")]
    FileSymlink { path: PathBuf },

    #[error("not a regular file: {path}")]
    FileNotRegular { path: PathBuf },

    #[error("file too big: {path} ({size} bytes, limit {limit})")]
    FileTooBig { path: PathBuf, size: u64, limit: u64 },

    #[error("failed to parse {format}: {path}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: SharedSource,
    },

    #[error("failed to load file: {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: SharedSource,
    },
}

impl LoadError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LoadError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn directory_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::DirectoryAccess {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::FileRead {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn parse<E>(path: impl Into<PathBuf>, format: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoadError::Parse {
            path: path.into(),
            format,
            source: Arc::new(source),
        }
    }

    /// Loader-defined failure for a listed file.
    pub fn load<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoadError::Load {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LoadError::DirectoryAccess { .. } => ErrorKind::DirectoryAccess,
            LoadError::OutOfScope { .. } => ErrorKind::OutOfScope,
            LoadError::NotFound { .. } => ErrorKind::NotFound,
            LoadError::FileRead { .. }
            | LoadError::FileSymlink { .. }
            | LoadError::FileNotRegular { .. }
            | LoadError::FileTooBig { .. }
            | LoadError::Parse { .. }
            | LoadError::Load { .. } => ErrorKind::LoadFailure,
        }
    }

    /// Display message followed by the chain of sources.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

/// Serializable form of one error map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(path: PathBuf, error: &LoadError) -> Self {
        Self {
            path,
            kind: error.kind(),
            message: error.detailed_message(),
        }
    }
}
