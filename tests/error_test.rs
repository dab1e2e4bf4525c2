//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use pir_dashboard::error::DashboardError;
use pir_dashboard_common::{RemoteError, SessionError, StoreError};

/// DashboardErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DashboardError::Config("bad endpoint".to_string()),
        DashboardError::FindingNotFound("F-99".to_string()),
        DashboardError::HttpClient("tls".to_string()),
        DashboardError::Prompt("not a terminal".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty message: {:?}", err);
    }
}

#[test]
fn test_finding_not_found_message() {
    let err = DashboardError::FindingNotFound("F-99".to_string());
    assert_eq!(format!("{}", err), "Finding not found: F-99");
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DashboardError = io_err.into();

    assert!(matches!(err, DashboardError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: DashboardError = json_err.into();

    assert!(matches!(err, DashboardError::JsonParse(_)));
}

/// ストアのエラーは共通エラー経由で透過的に表示
#[test]
fn test_store_error_transparent() {
    let err: DashboardError = StoreError::Save(RemoteError::Status(503)).into();

    assert!(matches!(err, DashboardError::Common(_)));
    assert_eq!(format!("{}", err), "Sync failed: HTTP error! status: 503");
}

#[test]
fn test_session_error_transparent() {
    let err: DashboardError = SessionError::NotEditing.into();
    assert_eq!(format!("{}", err), "Edit mode is not active");
}
