//! 資材リストの編集セッション
//!
//! 選択中の所見について、資材リストの作業コピー・行選択・編集モードを保持する。
//! 通信は一切行わない。保存はストア（`crate::store`）経由。
//!
//! 不変条件:
//! - `selection` は常に `0..materials.len()` の部分集合
//! - 編集モードを抜けると `selection` は空になる

use std::collections::BTreeSet;

use crate::error::SessionError;
use crate::types::{today_iso, MaterialField, MaterialRecord};

/// 新規行の日付を返す関数（テストでは固定値を差し込む）
pub type DateSource = fn() -> String;

#[derive(Debug, Clone)]
pub struct EditSession {
    materials: Vec<MaterialRecord>,
    /// seed時点のコピー（破棄・差分判定用）
    baseline: Vec<MaterialRecord>,
    selection: BTreeSet<usize>,
    is_editing: bool,
    today: DateSource,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_date_source(today_iso)
    }

    pub fn with_date_source(today: DateSource) -> Self {
        Self {
            materials: Vec::new(),
            baseline: Vec::new(),
            selection: BTreeSet::new(),
            is_editing: false,
            today,
        }
    }

    /// このセッションの時計で作った空行
    pub fn empty_material(&self) -> MaterialRecord {
        MaterialRecord::empty_dated((self.today)())
    }

    pub fn materials(&self) -> &[MaterialRecord] {
        &self.materials
    }

    /// 選択中の行番号（昇順）
    pub fn selection(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// 全選択チェックボックスの状態
    pub fn all_selected(&self) -> bool {
        self.selection.len() == self.materials.len()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// seed時点から変更があるか
    pub fn is_dirty(&self) -> bool {
        self.materials != self.baseline
    }

    /// サーバー側のリストで初期化（常にコピー、空なら空行1件）
    pub fn seed(&mut self, existing: Option<&[MaterialRecord]>) {
        let list = match existing {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => vec![self.empty_material()],
        };
        self.baseline = list.clone();
        self.materials = list;
        self.selection.clear();
        self.is_editing = false;
    }

    /// 所見未選択の状態に戻す
    pub fn clear(&mut self) {
        self.materials.clear();
        self.baseline.clear();
        self.selection.clear();
        self.is_editing = false;
    }

    /// 編集モード切替。抜けるときは選択を解除するが、編集内容は残す。
    ///
    /// 戻り値は切替後の編集モード。
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.is_editing = !self.is_editing;
        if !self.is_editing {
            self.selection.clear();
        }
        self.is_editing
    }

    pub fn exit_edit_mode(&mut self) {
        self.is_editing = false;
        self.selection.clear();
    }

    /// 編集内容を破棄してseed時点に戻し、編集モードを抜ける
    pub fn discard_and_exit(&mut self) {
        self.materials = self.baseline.clone();
        self.exit_edit_mode();
    }

    pub fn update_field(
        &mut self,
        index: usize,
        field: MaterialField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let len = self.materials.len();
        let record = self
            .materials
            .get(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        let updated = record.with_field(field, value);
        self.materials[index] = updated;
        Ok(())
    }

    pub fn add_row(&mut self) {
        let row = self.empty_material();
        self.materials.push(row);
    }

    /// 末尾の行を削除。残り1行以下なら何もしない。
    pub fn remove_row(&mut self) -> bool {
        if self.materials.len() <= 1 {
            return false;
        }
        self.materials.pop();
        self.selection.remove(&self.materials.len());
        true
    }

    /// 選択行をまとめて削除し、削除件数を返す
    pub fn remove_selected(&mut self) -> Result<usize, SessionError> {
        if !self.is_editing {
            return Err(SessionError::NotEditing);
        }
        if self.selection.is_empty() {
            return Err(SessionError::NothingSelected);
        }

        let before = self.materials.len();
        let selection = std::mem::take(&mut self.selection);
        let kept: Vec<MaterialRecord> = std::mem::take(&mut self.materials)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !selection.contains(i))
            .map(|(_, m)| m)
            .collect();
        let removed = before - kept.len();

        self.materials = if kept.is_empty() {
            vec![self.empty_material()]
        } else {
            kept
        };
        Ok(removed)
    }

    /// 1行だけ削除（カード表示のゴミ箱ボタン）
    pub fn remove_at(&mut self, index: usize) -> Result<(), SessionError> {
        if !self.is_editing {
            return Err(SessionError::NotEditing);
        }
        let len = self.materials.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }

        self.materials.remove(index);
        self.selection = self
            .selection
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();

        if self.materials.is_empty() {
            self.materials.push(self.empty_material());
        }
        Ok(())
    }

    /// 行の選択を切替。戻り値は切替後に選択されているか。
    pub fn toggle_row(&mut self, index: usize) -> Result<bool, SessionError> {
        if !self.is_editing {
            return Err(SessionError::NotEditing);
        }
        let len = self.materials.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }

        if self.selection.remove(&index) {
            Ok(false)
        } else {
            self.selection.insert(index);
            Ok(true)
        }
    }

    pub fn toggle_select_all(&mut self) -> Result<(), SessionError> {
        if !self.is_editing {
            return Err(SessionError::NotEditing);
        }
        if self.all_selected() {
            self.selection.clear();
        } else {
            self.selection = (0..self.materials.len()).collect();
        }
        Ok(())
    }

    /// 全消去（空行1件にする）。seedと違いサーバーの値には戻さない。
    pub fn reset(&mut self) {
        self.materials = vec![self.empty_material()];
        self.selection.clear();
    }
}
