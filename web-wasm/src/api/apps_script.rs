//! Apps Script バックエンド連携（fetch）
//!
//! POSTは Content-Type を付けずに送る（CORSプリフライトを起こさない）。

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use pir_dashboard_common::{
    DashboardPayload, MaterialRecord, RemoteCollaborator, RemoteError, SaveResponse,
    DEFAULT_ENDPOINT,
    remote::{check_status, decode_dashboard, decode_save_response, encode_save_request},
};

/// ビルド時に `PIR_DASHBOARD_ENDPOINT` で差し替え可能
pub fn configured_endpoint() -> &'static str {
    pick_endpoint(option_env!("PIR_DASHBOARD_ENDPOINT"))
}

fn pick_endpoint(build_time: Option<&'static str>) -> &'static str {
    build_time
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT)
}

#[derive(Debug, Clone, Copy)]
pub struct FetchRemote {
    endpoint: &'static str,
}

impl FetchRemote {
    pub fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }

    async fn fetch_text(&self, opts: &RequestInit) -> Result<String, RemoteError> {
        let request = Request::new_with_str_and_init(self.endpoint, opts).map_err(js_error)?;

        let window = web_sys::window()
            .ok_or_else(|| RemoteError::Network("window is not available".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let resp: Response = resp_value.dyn_into().map_err(js_error)?;

        check_status(resp.status())?;

        let text = JsFuture::from(resp.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| RemoteError::Malformed("response body is not text".into()))
    }
}

impl RemoteCollaborator for FetchRemote {
    async fn load_dashboard(&self) -> Result<DashboardPayload, RemoteError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let body = self.fetch_text(&opts).await?;
        decode_dashboard(&body)
    }

    async fn save_materials(
        &self,
        finding_name: &str,
        materials: &[MaterialRecord],
    ) -> Result<SaveResponse, RemoteError> {
        let body = encode_save_request(finding_name, materials)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let text = self.fetch_text(&opts).await?;
        decode_save_response(&text)
    }
}

fn js_error(value: JsValue) -> RemoteError {
    let message = value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value));
    RemoteError::Network(message)
}
