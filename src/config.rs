//! Configuration file parsing
//!
//! Reads fk-name-fix.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamingConfig {
    /// First segment of every generated name
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Segment between the base columns and the referenced table
    #[serde(default = "default_link")]
    pub link: String,

    /// Stand-ins for missing identity attributes
    #[serde(default)]
    pub placeholders: Placeholders,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            link: default_link(),
            placeholders: Placeholders::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Placeholders {
    #[serde(default = "default_base_table")]
    pub base_table: String,

    #[serde(default = "default_base_columns")]
    pub base_columns: String,

    #[serde(default = "default_referenced_table")]
    pub referenced_table: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            base_table: default_base_table(),
            base_columns: default_base_columns(),
            referenced_table: default_referenced_table(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Report format written to stdout
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_prefix() -> String {
    "fk".to_string()
}

fn default_link() -> String {
    "to".to_string()
}

fn default_base_table() -> String {
    "tbl".to_string()
}

fn default_base_columns() -> String {
    "col".to_string()
}

fn default_referenced_table() -> String {
    "ref".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let naming = &self.naming;
        for (key, value) in [("prefix", &naming.prefix), ("link", &naming.link)] {
            if !is_name_segment(value) {
                return Err(ConfigError::Validation(format!(
                    "invalid naming.{} value '{}'. Use lowercase ASCII letters, digits and '_'",
                    key, value
                )));
            }
        }

        let placeholders = &naming.placeholders;
        for (key, value) in [
            ("base_table", &placeholders.base_table),
            ("base_columns", &placeholders.base_columns),
            ("referenced_table", &placeholders.referenced_table),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "naming.placeholders.{} must not be empty",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn is_name_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
