//! Configuration system tests

use std::env;
use tabula::config::loader::*;
use tabula::config::validation::*;
use tabula::config::*;
use tabula::Error;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = TabulaConfig::default();

    assert_eq!(config.csv.delimiter, ',');
    assert!(config.csv.has_header);
    assert!(!config.csv.flexible);
    assert_eq!(config.frame.index_name_template, "index{}");
    assert_eq!(config.display.column_width, 12);

    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_serialization() {
    let config = TabulaConfig::default();

    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("csv:"));
    assert!(yaml.contains("frame:"));
    assert!(yaml.contains("display:"));
    assert_eq!(TabulaConfig::from_yaml(&yaml).unwrap(), config);

    let toml = config.to_toml().unwrap();
    assert!(toml.contains("[csv]"));
    assert!(toml.contains("[display]"));
    assert_eq!(TabulaConfig::from_toml(&toml).unwrap(), config);
}

#[test]
fn test_config_validation() {
    let mut config = TabulaConfig::default();
    assert!(validate_config(&config).is_ok());

    config.csv.delimiter = '\n';
    assert!(validate_config(&config).is_err());
    config.csv.delimiter = '\t';
    assert!(validate_config(&config).is_ok());

    config.frame.index_name_template = "no_field".to_string();
    assert!(matches!(
        validate_config(&config),
        Err(Error::ConfigurationError(_))
    ));
    config.frame.index_name_template = "level{0}".to_string();
    assert!(validate_config(&config).is_ok());

    config.display.max_rows = 0;
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_file_loading() {
    let dir = tempdir().unwrap();

    let yaml_path = dir.path().join("tabula.yaml");
    std::fs::write(&yaml_path, "csv:\n  delimiter: \"|\"\n  convert: true\n").unwrap();
    let config = TabulaConfig::from_file(&yaml_path).unwrap();
    assert_eq!(config.csv.delimiter, '|');
    assert!(config.csv.convert);
    assert_eq!(config.display, DisplayConfig::default());

    let toml_path = dir.path().join("tabula.toml");
    std::fs::write(&toml_path, "[display]\nmax_rows = 3\n").unwrap();
    let config = TabulaConfig::from_file(&toml_path).unwrap();
    assert_eq!(config.display.max_rows, 3);

    let bad_path = dir.path().join("tabula.ini");
    std::fs::write(&bad_path, "x=1").unwrap();
    assert!(TabulaConfig::from_file(&bad_path).is_err());

    assert!(TabulaConfig::from_file(dir.path().join("absent.yaml")).is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let mut config = TabulaConfig::default();
    config.csv.trim = true;
    config.frame.index_name_template = "lvl_{index}".to_string();
    config.save_to_file(&path).unwrap();

    let reloaded = load_from_file(&path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_environment_precedence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("base.yaml");
    std::fs::write(&path, "csv:\n  convert: false\n  trim: true\ndisplay:\n  max_rows: 4\n").unwrap();

    env::set_var("TABULA_CSV_CONVERT", "true");
    env::set_var("TABULA_DISPLAY_MAX_ROWS", "7");
    let loaded = TabulaConfig::load_with_precedence(Some(&path));
    env::set_var("TABULA_DISPLAY_MAX_ROWS", "many");
    let invalid = load_from_env();
    env::remove_var("TABULA_CSV_CONVERT");
    env::remove_var("TABULA_DISPLAY_MAX_ROWS");

    let config = loaded.unwrap();
    // Environment beats the file, the file beats the defaults
    assert!(config.csv.convert);
    assert_eq!(config.display.max_rows, 7);
    assert!(config.csv.trim);
    assert_eq!(config.csv.delimiter, ',');

    assert!(matches!(invalid, Err(Error::ConfigurationError(_))));
}

#[test]
fn test_configured_csv_loading() {
    let config = TabulaConfig::from_yaml("csv:\n  delimiter: \";\"\n  convert: true\n").unwrap();
    let table = tabula::read_csv_from_reader("a;b\n1;2\n".as_bytes(), &config.csv).unwrap();
    assert_eq!(
        table.column("b").unwrap().column_type(),
        tabula::ColumnType::Float64
    );
}
