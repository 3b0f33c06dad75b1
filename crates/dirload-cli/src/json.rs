//! JSON output format support.
//!
//! Provides a simple JSON report of a bulk load: loaded values and the error
//! map, with paths relative to the managed directory.

use dirload_core::diagnostics::ErrorRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root structure for JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Version of dirload that produced this output.
    pub version: String,
    /// Managed directory.
    pub directory: String,
    /// Successfully loaded entries in path order.
    pub loaded: Vec<JsonEntry>,
    /// Recorded errors in path order.
    pub errors: Vec<JsonError>,
    /// Summary counts.
    pub summary: JsonSummary,
}

/// A loaded entry in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonEntry {
    /// File path (forward slashes for cross-platform consistency).
    pub file: String,
    pub value: serde_json::Value,
}

/// A recorded error in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub file: String,
    /// Error kind, e.g. `load-failure`.
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub loaded: usize,
    pub errors: usize,
}

pub(crate) fn path_to_string(path: &Path, base_path: &Path) -> String {
    // The directory itself stays absolute so a listing failure is unambiguous
    if path == base_path {
        return path.to_string_lossy().replace('\\', "/");
    }
    path.strip_prefix(base_path)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Convert a load result to JSON output format.
pub fn load_to_json(
    directory: &Path,
    loaded: &BTreeMap<PathBuf, serde_json::Value>,
    errors: &[ErrorRecord],
) -> JsonOutput {
    let loaded: Vec<JsonEntry> = loaded
        .iter()
        .map(|(path, value)| JsonEntry {
            file: path_to_string(path, directory),
            value: value.clone(),
        })
        .collect();

    let errors: Vec<JsonError> = errors
        .iter()
        .map(|record| JsonError {
            file: path_to_string(&record.path, directory),
            kind: record.kind.as_str().to_string(),
            message: record.message.clone(),
        })
        .collect();

    JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        directory: directory.to_string_lossy().replace('\\', "/"),
        summary: JsonSummary {
            loaded: loaded.len(),
            errors: errors.len(),
        },
        loaded,
        errors,
    }
}
