//! 設定ファイルのテスト

use mediscan::config::Config;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mediscan").join("config.json");

    let config = Config {
        analysis_delay_ms: 300,
        output_dir: Some(PathBuf::from("results")),
    };
    config.save_to(&path).expect("保存失敗");

    let loaded = Config::load_from(&path).expect("読込失敗");
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_config_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(Config::load_from(&path).is_err());
}
