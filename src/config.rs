use crate::error::{DashboardError, Result};
use pir_dashboard_common::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "PIR_DASHBOARD_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DashboardError::Config("Home directory not found".into()))?;
        Ok(home.join(".config").join("pir-dashboard").join("config.json"))
    }

    /// 接続先の決定: 引数 → 環境変数 → 設定ファイル → 既定値
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        let env = std::env::var(ENDPOINT_ENV).ok();
        pick_endpoint(flag, env.as_deref(), self.endpoint.as_deref())
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        let endpoint = endpoint.trim().to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "Endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }
        self.endpoint = Some(endpoint);
        Ok(())
    }
}

fn pick_endpoint(flag: Option<&str>, env: Option<&str>, configured: Option<&str>) -> String {
    [flag, env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_endpoint_order() {
        assert_eq!(
            pick_endpoint(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
        assert_eq!(pick_endpoint(None, Some("http://env"), Some("http://file")), "http://env");
        assert_eq!(pick_endpoint(None, None, Some("http://file")), "http://file");
        assert_eq!(pick_endpoint(None, Some("  "), None), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_set_endpoint_requires_url() {
        let mut config = Config::default();
        assert!(config.set_endpoint("script.google.com".into()).is_err());
        config.set_endpoint(" https://example.test/exec ".into()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("https://example.test/exec"));
    }
}
