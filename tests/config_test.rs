//! 設定ファイルテスト

use pir_dashboard::config::Config;
use pir_dashboard::error::DashboardError;
use tempfile::tempdir;

/// 設定ファイルがなければ既定値
#[test]
fn test_load_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

/// 保存と読み込み（親ディレクトリも作成）
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.set_endpoint("https://example.test/exec".into()).unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.endpoint.as_deref(), Some("https://example.test/exec"));
    assert_eq!(loaded.resolve_endpoint(Some("http://flag.test")), "http://flag.test");
}

/// 壊れた設定ファイル
#[test]
fn test_load_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ endpoint: ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, DashboardError::JsonParse(_)));
}

/// 未知のキーや空オブジェクトは許容
#[test]
fn test_load_empty_object() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.endpoint.is_none());
}
