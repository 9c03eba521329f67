//! Simulator configuration.
//!
//! Resolution order:
//! 1. Explicit `--config <file>`
//! 2. `$SQLI_SIM_CONFIG`
//! 3. `~/.sqli-sim/config.json` (only if it exists)
//! 4. Built-in defaults
//!
//! `SQLI_SIM_LOG` and `SQLI_SIM_OUTPUT` override the file afterwards.

use crate::types::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SQLI_SIM_CONFIG";
pub const LOG_ENV: &str = "SQLI_SIM_LOG";
pub const OUTPUT_ENV: &str = "SQLI_SIM_OUTPUT";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How the CLI prints rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(SimError::config(format!("Unknown output format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directives, e.g. `sqli_sim=debug`.
    pub log_filter: String,
    pub log_format: LogFormat,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "sqli_sim=info".to_string(),
            log_format: LogFormat::default(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Default config file path (`~/.sqli-sim/config.json`).
    pub fn default_file() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".sqli-sim").join("config.json"))
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SimError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| SimError::config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Resolve configuration from the explicit path, environment and defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_file().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(
            std::env::var(LOG_ENV).ok(),
            std::env::var(OUTPUT_ENV).ok(),
        )?;
        Ok(config)
    }

    /// Apply log filter and output overrides.
    pub fn apply_overrides(&mut self, log_filter: Option<String>, output: Option<String>) -> Result<()> {
        if let Some(filter) = log_filter.filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        if let Some(output) = output {
            self.output = output.parse()?;
        }
        Ok(())
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_filter, "sqli_sim=info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.output, OutputFormat::Table);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"log_format": "json"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_filter, "sqli_sim=info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            log_filter: "sqli_sim=debug".to_string(),
            log_format: LogFormat::Json,
            output: OutputFormat::Json,
        };
        config.save(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_and_missing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Config::from_file(&path), Err(SimError::ConfigError(_))));
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.json")),
            Err(SimError::ConfigError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("sqli_sim=trace".to_string()), Some("JSON".to_string()))
            .unwrap();
        assert_eq!(config.log_filter, "sqli_sim=trace");
        assert_eq!(config.output, OutputFormat::Json);

        assert!(config.apply_overrides(None, Some("xml".to_string())).is_err());
        config.apply_overrides(Some("  ".to_string()), None).unwrap();
        assert_eq!(config.log_filter, "sqli_sim=trace");
    }
}
