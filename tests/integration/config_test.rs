use std::fs;
use std::time::Duration;

use hostwatch::core::config::{Config, ENV_ALERT_COOLDOWN, ENV_COMMAND_TIMEOUT};
use tempfile::TempDir;

#[test]
fn test_config_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "  \n").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hostwatch").join("config.json");

    let mut config = Config {
        warning_threshold: 65.0,
        critical_threshold: 90.0,
        poll_interval_secs: 15,
        ..Config::default()
    };
    config.add_destination("console");
    config.add_destination("https://hooks.example.com/alerts");
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.poll_interval(), Duration::from_secs(15));
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_invalid_json_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_env_overrides_apply_on_top_of_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{"alert_cooldown_secs": 600}"#).unwrap();

    let mut config = Config::load_from(&path).unwrap();
    assert_eq!(config.alert_cooldown(), Duration::from_secs(600));

    config
        .apply_overrides(|key| match key {
            k if k == ENV_ALERT_COOLDOWN => Some("60".to_string()),
            k if k == ENV_COMMAND_TIMEOUT => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(config.alert_cooldown(), Duration::from_secs(60));
    // zero timeout parses but fails validation
    assert!(config.validate().is_err());
}
