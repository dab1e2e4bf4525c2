//! バックエンド連携の抽象
//!
//! ネイティブ（reqwest）とWASM（fetch）で実装を差し替える。
//! テストではメモリ上の偽実装を使う。

use crate::error::RemoteError;
use crate::types::{DashboardPayload, MaterialRecord, SaveRequest, SaveResponse};

/// ダッシュボードのバックエンド
///
/// 実行はシングルスレッド前提のため `Send` は要求しない。
#[allow(async_fn_in_trait)]
pub trait RemoteCollaborator {
    /// `GET <endpoint>`
    async fn load_dashboard(&self) -> Result<DashboardPayload, RemoteError>;

    /// `POST <endpoint>` に `{findingName, materials}` を送信
    async fn save_materials(
        &self,
        finding_name: &str,
        materials: &[MaterialRecord],
    ) -> Result<SaveResponse, RemoteError>;
}

/// 2xx以外は失敗
pub fn check_status(status: u16) -> Result<(), RemoteError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(RemoteError::Status(status))
    }
}

pub fn decode_dashboard(body: &str) -> Result<DashboardPayload, RemoteError> {
    Ok(DashboardPayload::from_json(body)?)
}

pub fn encode_save_request(
    finding_name: &str,
    materials: &[MaterialRecord],
) -> Result<String, RemoteError> {
    let request = SaveRequest {
        finding_name: finding_name.to_string(),
        materials: materials.to_vec(),
    };
    Ok(serde_json::to_string(&request)?)
}

pub fn decode_save_response(body: &str) -> Result<SaveResponse, RemoteError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(check_status(302), Err(RemoteError::Status(302)));
        assert_eq!(check_status(500), Err(RemoteError::Status(500)));
    }

    #[test]
    fn test_decode_dashboard_malformed() {
        let err = decode_dashboard(r#"{"generalData": {}}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));

        let err = decode_dashboard("<html>Sign in</html>").unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn test_encode_save_request() {
        let body = encode_save_request("F-01", &[MaterialRecord::empty_dated("2024-05-01")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["findingName"], "F-01");
        assert_eq!(value["materials"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_save_response() {
        assert_eq!(decode_save_response(r#"{"status":"success"}"#).unwrap().status, "success");
        assert!(decode_save_response("OK").is_err());
    }
}
