//! Configuration validation utilities

use super::*;
use crate::core::error::{Error, Result};
use crate::table::format_index_name;

/// Validate the entire configuration
pub fn validate_config(config: &TabulaConfig) -> Result<()> {
    validate_csv_config(&config.csv)?;
    validate_frame_config(&config.frame)?;
    validate_display_config(&config.display)?;

    Ok(())
}

/// Validate delimited-text loader configuration
pub fn validate_csv_config(config: &CsvConfig) -> Result<()> {
    let delimiter = config.delimiter_byte()?;

    if matches!(delimiter, b'"' | b'\n' | b'\r') {
        return Err(Error::ConfigurationError(format!(
            "Delimiter {:?} conflicts with quoting or line breaks",
            config.delimiter
        )));
    }

    Ok(())
}

/// Validate frame construction configuration
pub fn validate_frame_config(config: &FrameConfig) -> Result<()> {
    let template = &config.index_name_template;

    // A template without a level field would give every index column the same name
    let first = format_index_name(template, 0)?;
    let second = format_index_name(template, 1)?;
    if first == second {
        return Err(Error::ConfigurationError(format!(
            "Index name template '{}' must contain a level field such as {{}}, {{0}} or {{index}}",
            template
        )));
    }

    Ok(())
}

/// Validate plain-text rendering configuration
pub fn validate_display_config(config: &DisplayConfig) -> Result<()> {
    if config.max_rows == 0 {
        return Err(Error::ConfigurationError(
            "max_rows must be greater than 0".to_string(),
        ));
    }

    if config.column_width == 0 {
        return Err(Error::ConfigurationError(
            "column_width must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
