//! Tests for TOML config discovery and loading
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SMILEFJES_CONFIG are marked with #[serial].

use serial_test::serial;
use smilefjes_common::config::{load_toml_config, locate_config_file, CONFIG_PATH_ENV};
use smilefjes_common::Error;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_explicit_path_wins_over_env() {
    std::env::set_var(CONFIG_PATH_ENV, "/from/env.toml");

    let located = locate_config_file(Some(PathBuf::from("/from/cli.toml").as_path()));
    assert_eq!(located, Some(PathBuf::from("/from/cli.toml")));

    std::env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    std::env::set_var(CONFIG_PATH_ENV, "/from/env.toml");

    let located = locate_config_file(None);
    assert_eq!(located, Some(PathBuf::from("/from/env.toml")));

    std::env::remove_var(CONFIG_PATH_ENV);
}

#[test]
fn test_load_full_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
source = "tilsyn.csv"
output = "out/map.geojson"
cache_dir = "cache"
max_entities = 10
registry_delay_ms = 50
geocode_delay_ms = 75
registry_cache_policy = "definitive-only"
flush_every = 100

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.source.as_deref(), Some("tilsyn.csv"));
    assert_eq!(config.output, Some(PathBuf::from("out/map.geojson")));
    assert_eq!(config.max_entities, Some(10));
    assert_eq!(config.registry_delay_ms, Some(50));
    assert_eq!(config.geocode_delay_ms, Some(75));
    assert_eq!(config.registry_cache_policy.as_deref(), Some("definitive-only"));
    assert_eq!(config.flush_every, Some(100));
    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let located = locate_config_file(Some(&missing)).unwrap();
    assert_eq!(located, missing);
    assert!(matches!(load_toml_config(&located), Err(Error::Config(_))));
}

#[test]
fn test_malformed_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "max_entities = [").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Toml(_))));
}
