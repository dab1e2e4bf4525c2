use crate::error::{DashboardError, Result};
use clap::{Parser, Subcommand};
use pir_dashboard_common::DashboardStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pir-dashboard")]
#[command(about = "PIR点検所見・必要資材リスト管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先エンドポイント（環境変数・設定ファイルより優先）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 一般情報と所見一覧を表示
    Show,

    /// 所見の詳細と資材リストを表示
    Finding {
        /// 所見名または一覧の番号
        #[arg(required = true)]
        target: String,
    },

    /// 資材リストを対話式で編集・同期
    Edit {
        /// 所見名または一覧の番号
        #[arg(required = true)]
        target: String,
    },

    /// 資材リストをJSONで書き出す
    Pull {
        /// 所見名または一覧の番号
        #[arg(required = true)]
        target: String,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// JSONファイルの資材リストで同期
    Sync {
        /// 所見名または一覧の番号
        #[arg(required = true)]
        target: String,

        /// 資材リストJSONファイル（MaterialRecordの配列）
        #[arg(short, long, required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定済みのエンドポイントを削除
        #[arg(long)]
        clear_endpoint: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 所見名、または一覧の番号（1始まり）で所見を選択
///
/// 番号と同じ名前の所見があれば名前を優先する。
pub fn select_target(store: &mut DashboardStore, target: &str) -> Result<()> {
    let payload = store
        .payload()
        .ok_or_else(|| DashboardError::FindingNotFound(target.to_string()))?;

    let index = payload.find_index(target).or_else(|| {
        target
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=payload.findings.len()).contains(n))
            .map(|n| n - 1)
    });

    match index {
        Some(index) => {
            store.select_finding(Some(index))?;
            Ok(())
        }
        None => Err(DashboardError::FindingNotFound(target.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pir_dashboard_common::DashboardPayload;

    /// 通信なしで読込済みのストアを作る
    fn loaded_store(json: &str) -> DashboardStore {
        let mut store = DashboardStore::new();
        store.begin_load().unwrap();
        store
            .finish_load(Ok(DashboardPayload::from_json(json).unwrap()))
            .unwrap();
        store
    }

    const PAYLOAD: &str = r#"{
        "generalData": {},
        "findings": [{"finding": "F-01"}, {"finding": "2"}, {"finding": "F-03"}],
        "materialsByFinding": {}
    }"#;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_select_target_by_name_and_number() {
        let mut store = loaded_store(PAYLOAD);
        select_target(&mut store, "F-03").unwrap();
        assert_eq!(store.selected_index(), Some(2));

        select_target(&mut store, "1").unwrap();
        assert_eq!(store.selected_index(), Some(0));

        // 名前が番号と同じなら名前を優先
        select_target(&mut store, "2").unwrap();
        assert_eq!(store.selected_index(), Some(1));
    }

    #[test]
    fn test_select_target_unknown() {
        let mut store = loaded_store(PAYLOAD);
        assert!(matches!(
            select_target(&mut store, "9"),
            Err(DashboardError::FindingNotFound(_))
        ));
        assert!(matches!(
            select_target(&mut store, "0"),
            Err(DashboardError::FindingNotFound(_))
        ));
        assert!(matches!(
            select_target(&mut store, "F-99"),
            Err(DashboardError::FindingNotFound(_))
        ));
    }
}
