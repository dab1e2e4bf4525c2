//! ダッシュボードストア
//!
//! 取得済みのダッシュボードと、選択中の所見の編集セッションを保持し、
//! バックエンドとの読込・同期を仲介する。
//!
//! 状態遷移:
//! `Idle → Loading → {Loaded | LoadError}`
//! `Loaded → Saving → {Loaded（再読込） | SaveError}`
//!
//! 読込・同期は `begin_*` / `finish_*` に分かれており、await を跨いで
//! ストアを借用できないホスト（WASMのシグナル）からも同じ遷移で駆動できる。
//! 実行中に次の `begin_*` を呼ぶと `StoreError::Busy` になる。

use tracing::{debug, info, warn};

use crate::error::{RemoteError, StoreError};
use crate::remote::RemoteCollaborator;
use crate::session::EditSession;
use crate::types::{DashboardPayload, FindingRecord, SaveRequest, SaveResponse};

/// ストアの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadError(String),
    Saving,
    SaveError(String),
}

impl StoreState {
    /// 読込または同期の実行中
    pub fn is_in_flight(&self) -> bool {
        matches!(self, StoreState::Loading | StoreState::Saving)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreState::Idle => "idle",
            StoreState::Loading => "loading",
            StoreState::Loaded => "loaded",
            StoreState::LoadError(_) => "load-error",
            StoreState::Saving => "saving",
            StoreState::SaveError(_) => "save-error",
        }
    }
}

/// 表示側から見た操作の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Pending,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    state: StoreState,
    payload: Option<DashboardPayload>,
    selected: Option<usize>,
    session: EditSession,
    last_save_status: Option<String>,
}

type Result<T> = std::result::Result<T, StoreError>;

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 編集セッションを差し込んで作成（時計の固定など）
    pub fn with_session(session: EditSession) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn status(&self) -> OpStatus {
        match &self.state {
            StoreState::Idle | StoreState::Loading | StoreState::Saving => OpStatus::Pending,
            StoreState::Loaded => OpStatus::Ready,
            StoreState::LoadError(message) | StoreState::SaveError(message) => {
                OpStatus::Error(message.clone())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    pub fn is_syncing(&self) -> bool {
        self.state == StoreState::Saving
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.state {
            StoreState::LoadError(message) => Some(message),
            _ => None,
        }
    }

    pub fn save_error(&self) -> Option<&str> {
        match &self.state {
            StoreState::SaveError(message) => Some(message),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&DashboardPayload> {
        self.payload.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_finding(&self) -> Option<&FindingRecord> {
        let index = self.selected?;
        self.payload.as_ref()?.finding(index)
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    /// 直近の同期成功時にバックエンドが返したstatus
    pub fn last_save_status(&self) -> Option<&str> {
        self.last_save_status.as_deref()
    }

    /// 所見を選択して編集セッションを作り直す。`None` で選択解除。
    ///
    /// 読込・同期の実行中は `Busy`（編集セッションに触れない）。
    pub fn select_finding(&mut self, index: Option<usize>) -> Result<()> {
        if self.state.is_in_flight() {
            return Err(StoreError::Busy);
        }
        let Some(index) = index else {
            self.selected = None;
            self.session.clear();
            return Ok(());
        };

        let payload = self.payload.as_ref().ok_or(StoreError::NotLoaded)?;
        let finding = payload
            .finding(index)
            .ok_or_else(|| StoreError::UnknownFinding(format!("#{}", index + 1)))?;

        let existing = payload.materials_by_finding.get(&finding.finding);
        self.session.seed(existing.map(Vec::as_slice));
        self.selected = Some(index);
        debug!(finding = %finding.finding, rows = self.session.materials().len(), "finding selected");
        Ok(())
    }

    pub fn select_finding_by_name(&mut self, name: &str) -> Result<()> {
        let index = self
            .payload
            .as_ref()
            .ok_or(StoreError::NotLoaded)?
            .find_index(name)
            .ok_or_else(|| StoreError::UnknownFinding(name.to_string()))?;
        self.select_finding(Some(index))
    }

    pub fn begin_load(&mut self) -> Result<()> {
        if self.state.is_in_flight() {
            return Err(StoreError::Busy);
        }
        debug!(from = self.state.as_str(), "loading dashboard");
        self.state = StoreState::Loading;
        Ok(())
    }

    /// 読込結果を反映。成功時は選択と編集セッションを破棄する。
    /// 失敗時は以前のダッシュボードを残す。
    pub fn finish_load(&mut self, result: std::result::Result<DashboardPayload, RemoteError>) -> Result<()> {
        if self.state != StoreState::Loading {
            return Err(StoreError::NotInFlight);
        }

        match result {
            Ok(payload) => {
                info!(findings = payload.findings.len(), "dashboard loaded");
                self.payload = Some(payload);
                self.selected = None;
                self.session.clear();
                self.state = StoreState::Loaded;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "dashboard load failed");
                self.state = StoreState::LoadError(err.to_string());
                Err(StoreError::Load(err))
            }
        }
    }

    pub async fn load<R: RemoteCollaborator>(&mut self, remote: &R) -> Result<()> {
        self.begin_load()?;
        let result = remote.load_dashboard().await;
        self.finish_load(result)
    }

    /// 選択中の所見と作業コピーから送信内容を作る
    pub fn begin_save(&mut self) -> Result<SaveRequest> {
        if self.state.is_in_flight() {
            return Err(StoreError::Busy);
        }
        let payload = self.payload.as_ref().ok_or(StoreError::NotLoaded)?;
        let index = self.selected.ok_or(StoreError::NoFindingSelected)?;
        let finding = payload
            .finding(index)
            .ok_or_else(|| StoreError::UnknownFinding(format!("#{}", index + 1)))?;

        let request = SaveRequest {
            finding_name: finding.finding.clone(),
            materials: self.session.materials().to_vec(),
        };
        debug!(finding = %request.finding_name, rows = request.materials.len(), "syncing materials");
        self.state = StoreState::Saving;
        Ok(request)
    }

    /// 同期結果を反映。失敗時は編集セッションに一切触れない。
    ///
    /// 成功時は編集モードを抜ける。続けて `load` で再読込すること。
    pub fn finish_save(
        &mut self,
        result: std::result::Result<SaveResponse, RemoteError>,
    ) -> Result<SaveResponse> {
        if self.state != StoreState::Saving {
            return Err(StoreError::NotInFlight);
        }

        match result {
            Ok(response) => {
                info!(status = %response.status, "materials synced");
                self.state = StoreState::Loaded;
                self.session.exit_edit_mode();
                self.last_save_status = Some(response.status.clone());
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "materials sync failed");
                self.state = StoreState::SaveError(err.to_string());
                Err(StoreError::Save(err))
            }
        }
    }

    /// 同期して、成功したら再読込する
    ///
    /// 再読込の失敗は状態（`LoadError`）に残るだけで、同期自体は成功として返す。
    pub async fn save<R: RemoteCollaborator>(&mut self, remote: &R) -> Result<SaveResponse> {
        let request = self.begin_save()?;
        let result = remote
            .save_materials(&request.finding_name, &request.materials)
            .await;
        let response = self.finish_save(result)?;

        if let Err(err) = self.load(remote).await {
            warn!(error = %err, "reload after sync failed");
        }
        Ok(response)
    }
}
