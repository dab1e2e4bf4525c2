//! PIR Dashboard Common Library
//!
//! CLIとWeb(WASM)で共有される型・編集セッション・ストア

pub mod types;
pub mod error;
pub mod session;
pub mod remote;
pub mod store;

pub use types::{
    today_iso, DashboardPayload, FindingRecord, GeneralData, MaterialField, MaterialRecord,
    SaveRequest, SaveResponse, DEFAULT_ENDPOINT,
};
pub use error::{Error, RemoteError, Result, SessionError, StoreError};
pub use session::EditSession;
pub use remote::RemoteCollaborator;
pub use store::{DashboardStore, OpStatus, StoreState};
