//! `formbind.toml` configuration.
//!
//! ```toml
//! [parser]
//! error_policy = "collect_all"
//! null_sentinel = "NULL"
//!
//! [output]
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::BindError;
use crate::options::ParseOptions;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "formbind.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormbindConfig {
    #[serde(default)]
    pub parser: ParseOptions,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Default CLI output format (`table`, `json` or `compact`).
    #[serde(default)]
    pub format: Option<String>,
}

impl FormbindConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, BindError> {
        toml::from_str(content).map_err(|err| BindError::Config {
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, BindError> {
        let content = std::fs::read_to_string(path).map_err(|err| BindError::Config {
            message: format!("failed to read {}: {err}", path.display()),
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Walks up from `start` looking for `formbind.toml`.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Loads the nearest config above `start`, or defaults when none exists.
    pub fn load_nearest(start: &Path) -> Result<Self, BindError> {
        match Self::discover(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorPolicy;

    #[test]
    fn parses_parser_section() {
        let config = FormbindConfig::from_toml_str(
            r#"
            [parser]
            error_policy = "collect_all"
            null_sentinel = "NONE"
            today = "2025-01-01"

            [output]
            format = "json"
            "#,
        )
        .expect("config parses");
        assert_eq!(config.parser.error_policy, Some(ErrorPolicy::CollectAll));
        assert_eq!(config.parser.null_sentinel, "NONE");
        assert_eq!(config.parser.today.map(|d| d.to_string()), Some("2025-01-01".into()));
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = FormbindConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, FormbindConfig::default());
        assert_eq!(config.parser.null_sentinel, "NULL");
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = FormbindConfig::from_toml_str("[parser]\nerror_policy = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
    }

    #[test]
    fn discovers_config_in_ancestor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("nested dirs");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[parser]\nnull_sentinel = \"-\"\n").expect("write");

        let found = FormbindConfig::discover(&nested).expect("config found");
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
        let config = FormbindConfig::load_nearest(&nested).expect("config loads");
        assert_eq!(config.parser.null_sentinel, "-");
    }
}
