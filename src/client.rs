//! バックエンドAPIクライアント（reqwest）
//!
//! スプレッドシートWebアプリはPOSTにリダイレクトで応答するため、
//! リダイレクトは追従する（reqwestの既定）。タイムアウトは設けない。

use crate::error::{DashboardError, Result};
use pir_dashboard_common::remote::{
    check_status, decode_dashboard, decode_save_response, encode_save_request,
};
use pir_dashboard_common::{
    DashboardPayload, MaterialRecord, RemoteCollaborator, RemoteError, SaveResponse,
};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pir-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteCollaborator for ApiClient {
    async fn load_dashboard(&self) -> std::result::Result<DashboardPayload, RemoteError> {
        debug!(url = %self.endpoint, "GET dashboard");
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(network_error)?;
        let body = read_body(response).await?;
        decode_dashboard(&body)
    }

    async fn save_materials(
        &self,
        finding_name: &str,
        materials: &[MaterialRecord],
    ) -> std::result::Result<SaveResponse, RemoteError> {
        let body = encode_save_request(finding_name, materials)?;
        debug!(url = %self.endpoint, finding = finding_name, rows = materials.len(), "POST materials");
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(network_error)?;
        let body = read_body(response).await?;
        decode_save_response(&body)
    }
}

async fn read_body(response: reqwest::Response) -> std::result::Result<String, RemoteError> {
    let status = response.status().as_u16();
    debug!(status, "response received");
    check_status(status)?;
    response.text().await.map_err(network_error)
}

fn network_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Network(err.to_string())
}
