//! エラー型定義

use thiserror::Error;

/// リモート（バックエンド）呼び出しの失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Connection failed: {0}")]
    Network(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Malformed(err.to_string())
    }
}

/// 編集セッションの前提条件違反
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Row {index} is out of range ({len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Edit mode is not active")]
    NotEditing,

    #[error("No rows selected")]
    NothingSelected,
}

/// ダッシュボードストアのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Another load or sync is already in progress")]
    Busy,

    #[error("No load or sync is in progress")]
    NotInFlight,

    #[error("Dashboard data has not been loaded")]
    NotLoaded,

    #[error("No finding selected")]
    NoFindingSelected,

    #[error("Unknown finding: {0}")]
    UnknownFinding(String),

    #[error("Load failed: {0}")]
    Load(RemoteError),

    #[error("Sync failed: {0}")]
    Save(RemoteError),
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown material field: {0}")]
    UnknownField(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
