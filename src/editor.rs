//! 対話式の資材リスト編集
//!
//! 画面のボタン操作をメニューに置き換えたもの。操作の適用は
//! `apply_action` に分離してあり、端末なしでテストできる。

use crate::error::{DashboardError, Result};
use crate::render::render_materials;
use dialoguer::{Confirm, Input, Select};
use pir_dashboard_common::{
    DashboardStore, EditSession, MaterialField, RemoteCollaborator, SessionError,
};

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    EnterEditMode,
    Cancel,
    EditCell,
    AddRow,
    RemoveLastRow,
    ToggleRow,
    ToggleSelectAll,
    DeleteSelected,
    DeleteRow,
    ClearAll,
    Discard,
    Sync,
    Quit,
}

impl MenuItem {
    pub fn label(&self, session: &EditSession) -> String {
        match self {
            MenuItem::EnterEditMode => "Edit mode".to_string(),
            MenuItem::Cancel => "Cancel (leave edit mode)".to_string(),
            MenuItem::EditCell => "Edit cell".to_string(),
            MenuItem::AddRow => "Add row".to_string(),
            MenuItem::RemoveLastRow => "Remove last row".to_string(),
            MenuItem::ToggleRow => "Select / unselect row".to_string(),
            MenuItem::ToggleSelectAll => {
                if session.all_selected() {
                    "Deselect all".to_string()
                } else {
                    "Select all".to_string()
                }
            }
            MenuItem::DeleteSelected => format!("Delete ({})", session.selected_count()),
            MenuItem::DeleteRow => "Delete one row".to_string(),
            MenuItem::ClearAll => "Clear all".to_string(),
            MenuItem::Discard => "Discard edits".to_string(),
            MenuItem::Sync => "Sync to sheet".to_string(),
            MenuItem::Quit => "Quit".to_string(),
        }
    }
}

/// 現在の状態で選べる操作
pub fn menu(session: &EditSession) -> Vec<MenuItem> {
    if !session.is_editing() {
        return vec![MenuItem::EnterEditMode, MenuItem::Quit];
    }

    let mut items = vec![
        MenuItem::EditCell,
        MenuItem::AddRow,
        MenuItem::RemoveLastRow,
        MenuItem::ToggleRow,
        MenuItem::ToggleSelectAll,
    ];
    if session.selected_count() > 0 {
        items.push(MenuItem::DeleteSelected);
    }
    items.extend([
        MenuItem::DeleteRow,
        MenuItem::ClearAll,
        MenuItem::Discard,
        MenuItem::Sync,
        MenuItem::Cancel,
        MenuItem::Quit,
    ]);
    items
}

/// セッションに適用する操作（入力済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    ToggleEditMode,
    SetField {
        index: usize,
        field: MaterialField,
        value: String,
    },
    AddRow,
    RemoveLastRow,
    ToggleRow(usize),
    ToggleSelectAll,
    DeleteSelected,
    DeleteRow(usize),
    ClearAll,
    Discard,
}

pub fn apply_action(
    session: &mut EditSession,
    action: EditorAction,
) -> std::result::Result<String, SessionError> {
    let message = match action {
        EditorAction::ToggleEditMode => {
            if session.toggle_edit_mode() {
                "Edit mode enabled".to_string()
            } else {
                "Left edit mode".to_string()
            }
        }
        EditorAction::SetField { index, field, value } => {
            session.update_field(index, field, value)?;
            format!("Row {} {} updated", index + 1, field.label())
        }
        EditorAction::AddRow => {
            session.add_row();
            format!("Row {} added", session.materials().len())
        }
        EditorAction::RemoveLastRow => {
            if session.remove_row() {
                "Last row removed".to_string()
            } else {
                "The list keeps at least one row".to_string()
            }
        }
        EditorAction::ToggleRow(index) => {
            if session.toggle_row(index)? {
                format!("Row {} selected", index + 1)
            } else {
                format!("Row {} unselected", index + 1)
            }
        }
        EditorAction::ToggleSelectAll => {
            session.toggle_select_all()?;
            format!("{} selected", session.selected_count())
        }
        EditorAction::DeleteSelected => {
            let removed = session.remove_selected()?;
            format!("{} records deleted", removed)
        }
        EditorAction::DeleteRow(index) => {
            session.remove_at(index)?;
            format!("Row {} deleted", index + 1)
        }
        EditorAction::ClearAll => {
            session.reset();
            "All rows cleared".to_string()
        }
        EditorAction::Discard => {
            session.discard_and_exit();
            "Edits discarded".to_string()
        }
    };
    Ok(message)
}

/// 選択中の所見を対話式で編集
pub async fn run_interactive_edit<R: RemoteCollaborator>(
    store: &mut DashboardStore,
    remote: &R,
) -> Result<()> {
    let finding_name = store
        .selected_finding()
        .map(|f| f.finding.clone())
        .ok_or_else(|| DashboardError::FindingNotFound("no finding selected".into()))?;

    loop {
        println!("\n{}", render_materials(store.session()));

        let items = menu(store.session());
        let labels: Vec<String> = items.iter().map(|i| i.label(store.session())).collect();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        let action = match items[choice] {
            MenuItem::EnterEditMode | MenuItem::Cancel => EditorAction::ToggleEditMode,
            MenuItem::EditCell => {
                let index = prompt_row(store.session(), "Row")?;
                let field = prompt_field()?;
                let current = store.session().materials()[index].get(field).to_string();
                let value: String = Input::new()
                    .with_prompt(field.label())
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                EditorAction::SetField { index, field, value }
            }
            MenuItem::AddRow => EditorAction::AddRow,
            MenuItem::RemoveLastRow => EditorAction::RemoveLastRow,
            MenuItem::ToggleRow => EditorAction::ToggleRow(prompt_row(store.session(), "Row")?),
            MenuItem::ToggleSelectAll => EditorAction::ToggleSelectAll,
            MenuItem::DeleteSelected => {
                let count = store.session().selected_count();
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {} records?", count))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    continue;
                }
                EditorAction::DeleteSelected
            }
            MenuItem::DeleteRow => EditorAction::DeleteRow(prompt_row(store.session(), "Delete row")?),
            MenuItem::ClearAll => EditorAction::ClearAll,
            MenuItem::Discard => EditorAction::Discard,
            MenuItem::Sync => {
                println!("Synchronizing...");
                match store.save(remote).await {
                    Ok(_) => {
                        println!("✔ Sync Successful!");
                        if let Some(err) = store.load_error() {
                            println!("Reload failed: {}", err);
                        }
                        if !reselect_after_sync(store, &finding_name) {
                            return Ok(());
                        }
                    }
                    Err(err) => println!("Sync Failed: {}", err),
                }
                continue;
            }
            MenuItem::Quit => {
                if store.session().is_dirty() {
                    let discard = Confirm::new()
                        .with_prompt("Unsaved edits will be lost. Quit anyway?")
                        .default(false)
                        .interact()?;
                    if !discard {
                        continue;
                    }
                }
                return Ok(());
            }
        };

        match apply_action(store.session_mut(), action) {
            Ok(message) => println!("→ {}", message),
            Err(err) => println!("→ {}", err),
        }
    }
}

/// 再読込で選択が外れるので同じ所見を選び直す。見つからなければ false。
fn reselect_after_sync(store: &mut DashboardStore, finding_name: &str) -> bool {
    match store.select_finding_by_name(finding_name) {
        Ok(()) => true,
        Err(err) => {
            println!("Cannot reopen {}: {}", finding_name, err);
            false
        }
    }
}

fn prompt_row(session: &EditSession, prompt: &str) -> Result<usize> {
    let rows: Vec<String> = session
        .materials()
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mark = if session.is_selected(i) { "[x] " } else { "" };
            let part = if m.part_no.is_empty() { "—" } else { m.part_no.as_str() };
            format!("{}Record {}: {} {}", mark, i + 1, part, m.description)
        })
        .collect();

    Ok(Select::new()
        .with_prompt(prompt)
        .items(&rows)
        .default(0)
        .interact()?)
}

fn prompt_field() -> Result<MaterialField> {
    let labels: Vec<&str> = MaterialField::ALL.iter().map(|f| f.label()).collect();
    let choice = Select::new()
        .with_prompt("Field")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MaterialField::ALL[choice])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pir_dashboard_common::{DashboardPayload, MaterialRecord};

    fn fixed_today() -> String {
        "2024-05-01".to_string()
    }

    fn session_with(parts: &[&str]) -> EditSession {
        let list: Vec<MaterialRecord> = parts
            .iter()
            .map(|p| MaterialRecord {
                part_no: p.to_string(),
                ..MaterialRecord::empty_dated("2024-01-10")
            })
            .collect();
        let mut session = EditSession::with_date_source(fixed_today);
        session.seed(Some(&list));
        session
    }

    fn loaded_store(json: &str) -> DashboardStore {
        let mut store = DashboardStore::with_session(EditSession::with_date_source(fixed_today));
        store.begin_load().unwrap();
        store
            .finish_load(Ok(DashboardPayload::from_json(json).unwrap()))
            .unwrap();
        store
    }

    #[test]
    fn test_reselect_after_sync() {
        let mut store = loaded_store(
            r#"{"generalData":{},"findings":[{"finding":"F-01"}],
                "materialsByFinding":{"F-01":[{"partNo":"A1"}]}}"#,
        );
        assert!(reselect_after_sync(&mut store, "F-01"));
        assert_eq!(store.selected_index(), Some(0));
        assert_eq!(store.session().materials()[0].part_no, "A1");
    }

    #[test]
    fn test_reselect_after_sync_missing_finding() {
        // 同期後にバックエンド側で所見名が変わった場合
        let mut store = loaded_store(
            r#"{"generalData":{},"findings":[{"finding":"F-01 (rev)"}],"materialsByFinding":{}}"#,
        );
        assert!(!reselect_after_sync(&mut store, "F-01"));
        assert_eq!(store.selected_index(), None);
    }

    #[test]
    fn test_menu_read_only() {
        let session = session_with(&["A1"]);
        assert_eq!(menu(&session), vec![MenuItem::EnterEditMode, MenuItem::Quit]);
    }

    #[test]
    fn test_menu_delete_only_with_selection() {
        let mut session = session_with(&["A1", "B2"]);
        session.toggle_edit_mode();
        assert!(!menu(&session).contains(&MenuItem::DeleteSelected));

        session.toggle_row(1).unwrap();
        let items = menu(&session);
        assert!(items.contains(&MenuItem::DeleteSelected));
        assert_eq!(MenuItem::DeleteSelected.label(&session), "Delete (1)");
    }

    #[test]
    fn test_select_all_label() {
        let mut session = session_with(&["A1", "B2"]);
        session.toggle_edit_mode();
        assert_eq!(MenuItem::ToggleSelectAll.label(&session), "Select all");
        session.toggle_select_all().unwrap();
        assert_eq!(MenuItem::ToggleSelectAll.label(&session), "Deselect all");
    }

    #[test]
    fn test_apply_edit_flow() {
        let mut session = session_with(&["A1", "B2"]);
        apply_action(&mut session, EditorAction::ToggleEditMode).unwrap();
        apply_action(
            &mut session,
            EditorAction::SetField {
                index: 1,
                field: MaterialField::Qty,
                value: "4".into(),
            },
        )
        .unwrap();
        apply_action(&mut session, EditorAction::ToggleRow(0)).unwrap();
        let message = apply_action(&mut session, EditorAction::DeleteSelected).unwrap();

        assert_eq!(message, "1 records deleted");
        assert_eq!(session.materials().len(), 1);
        assert_eq!(session.materials()[0].part_no, "B2");
        assert_eq!(session.materials()[0].qty, "4");
    }

    #[test]
    fn test_apply_rejects_without_edit_mode() {
        let mut session = session_with(&["A1"]);
        assert_eq!(
            apply_action(&mut session, EditorAction::ToggleRow(0)),
            Err(SessionError::NotEditing)
        );
    }

    #[test]
    fn test_apply_remove_last_row_message() {
        let mut session = session_with(&["A1"]);
        let message = apply_action(&mut session, EditorAction::RemoveLastRow).unwrap();
        assert_eq!(message, "The list keeps at least one row");
    }

    #[test]
    fn test_apply_discard() {
        let mut session = session_with(&["A1"]);
        apply_action(&mut session, EditorAction::ToggleEditMode).unwrap();
        apply_action(&mut session, EditorAction::ClearAll).unwrap();
        assert_eq!(session.materials()[0].part_no, "");

        apply_action(&mut session, EditorAction::Discard).unwrap();
        assert_eq!(session.materials()[0].part_no, "A1");
        assert!(!session.is_editing());
    }
}
