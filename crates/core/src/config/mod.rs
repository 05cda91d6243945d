//! Configuration module for tsgraph
//!
//! This module provides configuration structures and loading mechanisms for the
//! linker and its hosting command. Configuration can be loaded from TOML files
//! and/or environment variables.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.tsgraph/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".tsgraph").join("config.toml"))
}

/// Main configuration structure for tsgraph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Linking session configuration
    #[serde(default)]
    pub linker: LinkerConfig,

    /// Output configuration for the hosting command
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration of a linking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// File name appended to a project path to form its config-file path
    #[serde(default = "default_project_config_file")]
    pub project_config_file: String,

    /// Whether dependency edges are propagated along containment
    #[serde(default = "default_propagate_dependencies")]
    pub propagate_dependencies: bool,

    /// Dump every registered FQN after ingestion
    #[serde(default)]
    pub log_registered_fqns: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            project_config_file: default_project_config_file(),
            propagate_dependencies: default_propagate_dependencies(),
            log_registered_fqns: false,
        }
    }
}

impl LinkerConfig {
    /// Config-file path of the project located at `project_path`
    pub fn config_file_path(&self, project_path: &str) -> String {
        format!(
            "{}/{}",
            project_path.trim_end_matches('/'),
            self.project_config_file
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "summary" (default) or "json"
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.linker.project_config_file.trim().is_empty() {
            return Err(Error::config(
                "linker.project_config_file must not be empty".to_string(),
            ));
        }
        if self.linker.project_config_file.contains('/') {
            return Err(Error::config(format!(
                "linker.project_config_file must be a file name, got {}",
                self.linker.project_config_file
            )));
        }
        if !VALID_OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(Error::config(format!(
                "Invalid output.format {}. Must be one of: {}",
                self.output.format,
                VALID_OUTPUT_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}
