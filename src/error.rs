use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Finding not found: {0}")]
    FindingNotFound(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pir_dashboard_common::Error),
}

impl From<pir_dashboard_common::StoreError> for DashboardError {
    fn from(err: pir_dashboard_common::StoreError) -> Self {
        DashboardError::Common(err.into())
    }
}

impl From<pir_dashboard_common::SessionError> for DashboardError {
    fn from(err: pir_dashboard_common::SessionError) -> Self {
        DashboardError::Common(err.into())
    }
}

impl From<dialoguer::Error> for DashboardError {
    fn from(err: dialoguer::Error) -> Self {
        DashboardError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
