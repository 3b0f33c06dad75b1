//! Loader configuration

use crate::diagnostics::{LoadError, LoadResult};
use crate::file_utils::DEFAULT_MAX_FILE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a loadable directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory to manage; the CLI resolves a relative value against the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Accepted extensions, each with its leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// How file content becomes a value
    #[serde(default)]
    pub format: LoadFormat,

    /// Largest file (in bytes) a load will read
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_extensions() -> Vec<String> {
    vec![".json".to_string()]
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extensions: default_extensions(),
            format: LoadFormat::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Content format used by the bundled loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadFormat {
    /// Pick from the first configured extension
    #[default]
    Auto,
    /// Raw UTF-8 text
    Text,
    Json,
    Yaml,
    Toml,
}

impl LoadFormat {
    /// Resolve `Auto` against an extension such as `.yml`.
    pub fn resolve(self, extension: Option<&str>) -> LoadFormat {
        match self {
            LoadFormat::Auto => match extension {
                Some(".json") => LoadFormat::Json,
                Some(".yaml" | ".yml") => LoadFormat::Yaml,
                Some(".toml") => LoadFormat::Toml,
                _ => LoadFormat::Text,
            },
            other => other,
        }
    }
}

impl LoaderConfig {
    /// Load config from file
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config or use default
    pub fn load_or_default(path: Option<&PathBuf>) -> Self {
        path.and_then(|p| Self::load(p).ok()).unwrap_or_default()
    }

    /// Check extensions and size limit before building a directory from this config.
    pub fn validate(&self) -> LoadResult<()> {
        if self.extensions.is_empty() {
            return Err(LoadError::invalid_argument("no extensions configured"));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(LoadError::invalid_argument(format!(
                "extension must start with '.': {bad:?}"
            )));
        }
        if self.max_file_size == 0 {
            return Err(LoadError::invalid_argument("max_file_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extensions, vec![".json".to_string()]);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.format, LoadFormat::Auto);
    }

    #[test]
    fn test_validate_rejects_bad_extensions() {
        let mut config = LoaderConfig::default();
        config.extensions = vec!["json".to_string()];
        assert_eq!(
            config.validate().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );

        config.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let mut config = LoaderConfig::default();
        config.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auto_format_resolution() {
        assert_eq!(LoadFormat::Auto.resolve(Some(".yml")), LoadFormat::Yaml);
        assert_eq!(LoadFormat::Auto.resolve(Some(".yaml")), LoadFormat::Yaml);
        assert_eq!(LoadFormat::Auto.resolve(Some(".toml")), LoadFormat::Toml);
        assert_eq!(LoadFormat::Auto.resolve(Some(".md")), LoadFormat::Text);
        assert_eq!(LoadFormat::Auto.resolve(None), LoadFormat::Text);
        assert_eq!(LoadFormat::Json.resolve(Some(".txt")), LoadFormat::Json);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
directory = "/srv/data"
extensions = [".yml", ".yaml"]
format = "Yaml"
max_file_size = 4096
"#;

        let config: LoaderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.directory, Some(PathBuf::from("/srv/data")));
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.format, LoadFormat::Yaml);
        assert_eq!(config.max_file_size, 4096);
    }

    #[test]
    fn test_toml_deserialization_defaults() {
        let config: LoaderConfig = toml::from_str("").unwrap();
        assert!(config.directory.is_none());
        assert_eq!(config.extensions, vec![".json".to_string()]);
        assert_eq!(config.format, LoadFormat::Auto);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let config = LoaderConfig::load_or_default(Some(&missing));
        assert_eq!(config.extensions, vec![".json".to_string()]);

        let broken = temp.path().join("broken.toml");
        std::fs::write(&broken, "extensions = [").unwrap();
        assert!(LoaderConfig::load(&broken).is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&LoaderConfig::default()).unwrap();
        let parsed: LoaderConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.extensions, vec![".json".to_string()]);
        assert_eq!(parsed.format, LoadFormat::Auto);
    }
}
