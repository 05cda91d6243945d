//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [linker]
        project_config_file = "tsconfig.build.json"
        propagate_dependencies = false

        [output]
        format = "json"
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.linker.project_config_file, "tsconfig.build.json");
    assert!(!config.linker.propagate_dependencies);
    assert_eq!(config.output.format, "json");
}

#[test]
fn test_from_toml_str_empty_applies_defaults() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config.linker.project_config_file, "tsconfig.json");
    assert!(config.linker.propagate_dependencies);
    assert!(!config.linker.log_registered_fqns);
    assert_eq!(config.output.format, "summary");
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let toml = r#"
        [linker
        propagate_dependencies = true
    "#;

    let result = Config::from_toml_str(toml);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_validate_rejects_unknown_output_format() {
    let mut config = Config::default();
    config.output.format = "xml".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid output.format xml"));
}

#[test]
fn test_validate_rejects_empty_config_file_name() {
    let mut config = Config::default();
    config.linker.project_config_file = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_config_file_with_directory() {
    let mut config = Config::default();
    config.linker.project_config_file = "config/tsconfig.json".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_file_path_joins_project_path() {
    let linker = LinkerConfig::default();
    assert_eq!(
        linker.config_file_path("/repo/packages/app"),
        "/repo/packages/app/tsconfig.json"
    );
    assert_eq!(
        linker.config_file_path("/repo/packages/app/"),
        "/repo/packages/app/tsconfig.json"
    );
}

#[test]
fn test_from_file_reads_linker_section() {
    let file = create_temp_config_file(
        r#"
        [linker]
        log_registered_fqns = true
    "#,
    )
    .expect("Failed to create config file");

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert!(config.linker.log_registered_fqns);
    assert_eq!(config.linker.project_config_file, "tsconfig.json");
}

#[test]
fn test_from_file_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::from_file(&dir.path().join("absent.toml")).expect("Failed to load");
    assert_eq!(config.linker, LinkerConfig::default());
}

#[test]
fn test_from_file_rejects_invalid_values() {
    let file = create_temp_config_file(
        r#"
        [linker]
        project_config_file = ""
    "#,
    )
    .expect("Failed to create config file");

    assert!(Config::from_file(file.path()).is_err());
}
