//! Configuration management for tabula
//!
//! Settings come from three layers, lowest precedence first:
//! - built-in defaults
//! - a YAML or TOML configuration file
//! - `TABULA_*` environment variables

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod loader;
pub mod validation;

/// Main configuration structure for tabula
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaConfig {
    /// Delimited-text loader settings
    pub csv: CsvConfig,
    /// Foreign frame construction settings
    pub frame: FrameConfig,
    /// Plain-text rendering settings
    pub display: DisplayConfig,
}

/// Delimited-text loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Field delimiter; must be a single ASCII character
    pub delimiter: char,
    /// Whether the first row holds column names
    pub has_header: bool,
    /// Try to reinterpret each text column as float64
    pub convert: bool,
    /// Strip surrounding whitespace from every field
    pub trim: bool,
    /// Accept rows whose field count differs from the header
    pub flexible: bool,
}

/// Foreign frame construction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Name template for row index columns
    pub index_name_template: String,
}

/// Plain-text rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum number of rows rendered
    pub max_rows: usize,
    /// Width of each rendered cell
    pub column_width: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            convert: false,
            trim: false,
            flexible: false,
        }
    }
}

impl CsvConfig {
    /// Default settings with numeric conversion switched on or off
    pub fn with_convert(convert: bool) -> Self {
        Self {
            convert,
            ..Self::default()
        }
    }

    /// The delimiter as the single byte the csv reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::ConfigurationError(format!(
                "Delimiter '{}' is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            index_name_template: crate::table::DEFAULT_INDEX_TEMPLATE.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_rows: 10,
            column_width: 12,
        }
    }
}

impl TabulaConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// Load configuration with precedence: defaults -> file -> environment
    pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        loader::load_with_precedence(config_file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path.as_ref())
    }

    /// Convert configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }
}
