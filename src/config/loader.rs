//! Configuration loading utilities
//!
//! Handles loading configuration from files and the environment with proper
//! precedence and validation.

use super::*;
use crate::core::error::{Error, Result};
use std::env;
use std::fs;
use std::path::Path;

/// Load configuration from environment variables
pub fn load_from_env() -> Result<TabulaConfig> {
    let mut config = TabulaConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Overwrite settings that have a `TABULA_*` environment variable set
pub fn apply_env_overrides(config: &mut TabulaConfig) -> Result<()> {
    if let Ok(delimiter) = env::var("TABULA_CSV_DELIMITER") {
        let mut chars = delimiter.chars();
        config.csv.delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "Invalid TABULA_CSV_DELIMITER: expected one character, got '{}'",
                    delimiter
                )))
            }
        };
    }

    if let Ok(convert) = env::var("TABULA_CSV_CONVERT") {
        config.csv.convert = convert.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid TABULA_CSV_CONVERT: {}", e))
        })?;
    }

    if let Ok(trim) = env::var("TABULA_CSV_TRIM") {
        config.csv.trim = trim
            .parse()
            .map_err(|e| Error::ConfigurationError(format!("Invalid TABULA_CSV_TRIM: {}", e)))?;
    }

    if let Ok(flexible) = env::var("TABULA_CSV_FLEXIBLE") {
        config.csv.flexible = flexible.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid TABULA_CSV_FLEXIBLE: {}", e))
        })?;
    }

    if let Ok(template) = env::var("TABULA_INDEX_TEMPLATE") {
        config.frame.index_name_template = template;
    }

    if let Ok(max_rows) = env::var("TABULA_DISPLAY_MAX_ROWS") {
        config.display.max_rows = max_rows.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid TABULA_DISPLAY_MAX_ROWS: {}", e))
        })?;
    }

    Ok(())
}

/// Load configuration from a file (YAML or TOML based on extension)
pub fn load_from_file(path: &Path) -> Result<TabulaConfig> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        // No extension: YAML first, then TOML
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<TabulaConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<TabulaConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<TabulaConfig> {
    let mut config = match config_file {
        Some(file_path) => load_from_file(file_path.as_ref())?,
        None => TabulaConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    Ok(config)
}

/// Save configuration to a file
pub fn save_to_file(config: &TabulaConfig, path: &Path) -> Result<()> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => config.to_yaml()?,
        Some("toml") => config.to_toml()?,
        Some(ext) => {
            return Err(Error::ConfigurationError(format!(
                "Unsupported config file format: {}",
                ext
            )))
        }
        None => config.to_yaml()?,
    };

    fs::write(path, contents).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to write config file {}: {}",
            path.display(),
            e
        ))
    })
}
