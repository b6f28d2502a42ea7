use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

use formbind::config::FormbindConfig;
use formbind::options::ParseOptions;

use crate::output::OutputFormat;

/// Resolved configuration for one CLI invocation
pub struct CliContext {
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    pub config: FormbindConfig,
}

impl CliContext {
    /// Load the explicit `--config` file, or the nearest `formbind.toml`
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path.to_path_buf()),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::discover_from(&current_dir)
            }
        }
    }

    /// Walk up from `start` looking for a config file
    pub fn discover_from(start: &Path) -> Result<Self> {
        match FormbindConfig::discover(start) {
            Some(path) => Self::from_path(path),
            None => Ok(Self {
                config_path: None,
                config: FormbindConfig::default(),
            }),
        }
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        let config = FormbindConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Parser options from the `[parser]` section
    pub fn parse_options(&self) -> ParseOptions {
        self.config.parser.clone()
    }

    /// Output format: the flag wins, then `[output] format`, then table
    pub fn output_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = flag {
            return Ok(format);
        }
        match self.config.output.format.as_deref() {
            Some(name) => OutputFormat::from_str(name, true)
                .map_err(|err| anyhow::anyhow!("Invalid [output] format '{name}': {err}")),
            None => Ok(OutputFormat::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = CliContext::discover_from(dir.path()).expect("context");
        assert!(ctx.config_path.is_none());
        assert_eq!(ctx.output_format(None).expect("format"), OutputFormat::Table);
    }

    #[test]
    fn test_config_output_format_and_flag_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("formbind.toml"), "[output]\nformat = \"json\"\n").expect("write config");
        let nested = dir.path().join("forms");
        std::fs::create_dir(&nested).expect("create dir");

        let ctx = CliContext::discover_from(&nested).expect("context");
        assert!(ctx.config_path.is_some());
        assert_eq!(ctx.output_format(None).expect("format"), OutputFormat::Json);
        assert_eq!(
            ctx.output_format(Some(OutputFormat::Compact)).expect("format"),
            OutputFormat::Compact
        );
    }

    #[test]
    fn test_invalid_output_format_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("formbind.toml"), "[output]\nformat = \"yaml\"\n").expect("write config");
        let ctx = CliContext::discover_from(dir.path()).expect("context");
        assert!(ctx.output_format(None).is_err());
    }
}
