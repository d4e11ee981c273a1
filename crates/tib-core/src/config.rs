//! Build and conversion settings loaded from TOML.
//!
//! Defaults are embedded via `include_str!("default_build.toml")`; callers
//! may parse their own file with [`parse_config_toml`].

use std::path::PathBuf;

use serde::Deserialize;

use crate::translit::Mode;

pub const DEFAULT_BUILD_TOML: &str = include_str!("default_build.toml");

/// Returns the embedded default configuration TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_BUILD_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub build: BuildSettings,
    #[serde(default)]
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

fn default_optimize() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSettings {
    #[serde(default, rename = "mode")]
    mode_name: Option<String>,
    #[serde(skip)]
    mode: Mode,
}

impl FilterSettings {
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Config {
    /// The embedded defaults.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_config_toml(DEFAULT_BUILD_TOML)
    }
}

pub fn parse_config_toml(toml_str: &str) -> Result<Config, ConfigError> {
    let mut config: Config =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    if config.build.inputs.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "build.inputs".to_string(),
            reason: "at least one source is required".to_string(),
        });
    }
    if config.build.output.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "build.output".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(name) = &config.filter.mode_name {
        config.filter.mode = name.parse().map_err(|e| ConfigError::InvalidValue {
            field: "filter.mode".to_string(),
            reason: format!("{e}"),
        })?;
    }
    Ok(config)
}
