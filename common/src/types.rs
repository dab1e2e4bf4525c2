//! ダッシュボードの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - MaterialRecord: 所見ごとの必要資材1行
//! - FindingRecord: 点検所見（読み取り専用）
//! - DashboardPayload: GETで取得するダッシュボード全体
//! - SaveRequest / SaveResponse: POSTの送受信形式
//!
//! スプレッドシート由来のバックエンドはセルの値を数値や真偽値、nullで返すことがあるため、
//! テキスト項目はすべて寛容にデコードする。

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// 本番バックエンド（スプレッドシートWebアプリ）のエンドポイント
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbyQG9-FrBkQidkbUzWgVUUHxK7mFVYyru5RO7EKyfOzomliEn8KBCF_bkagjNw_CK8r/exec";

/// 新規行の単位の既定値
pub const DEFAULT_UOM: &str = "EA";

/// 今日の日付（UTC, YYYY-MM-DD）
pub fn today_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// 資材1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub part_no: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    /// 数量（数値だがテキストとして保持）
    #[serde(default, deserialize_with = "lenient_string")]
    pub qty: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub uom: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub availability: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub pr: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub po: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub note: String,

    /// 変更日（ISO日付文字列）
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_change: String,
}

impl MaterialRecord {
    /// 新規の空行（日付は今日）
    pub fn empty() -> Self {
        Self::empty_dated(today_iso())
    }

    /// 日付を指定して空行を作成
    pub fn empty_dated(date: impl Into<String>) -> Self {
        Self {
            uom: DEFAULT_UOM.to_string(),
            date_change: date.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: MaterialField) -> &str {
        match field {
            MaterialField::PartNo => &self.part_no,
            MaterialField::Description => &self.description,
            MaterialField::Qty => &self.qty,
            MaterialField::Uom => &self.uom,
            MaterialField::Availability => &self.availability,
            MaterialField::Pr => &self.pr,
            MaterialField::Po => &self.po,
            MaterialField::Note => &self.note,
            MaterialField::DateChange => &self.date_change,
        }
    }

    /// 指定項目だけを差し替えたコピーを返す
    pub fn with_field(&self, field: MaterialField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            MaterialField::PartNo => &mut next.part_no,
            MaterialField::Description => &mut next.description,
            MaterialField::Qty => &mut next.qty,
            MaterialField::Uom => &mut next.uom,
            MaterialField::Availability => &mut next.availability,
            MaterialField::Pr => &mut next.pr,
            MaterialField::Po => &mut next.po,
            MaterialField::Note => &mut next.note,
            MaterialField::DateChange => &mut next.date_change,
        };
        *slot = value.into();
        next
    }
}

/// 資材の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialField {
    PartNo,
    Description,
    Qty,
    Uom,
    Availability,
    Pr,
    Po,
    Note,
    DateChange,
}

impl MaterialField {
    /// 表の列順
    pub const ALL: [MaterialField; 9] = [
        MaterialField::PartNo,
        MaterialField::Description,
        MaterialField::Qty,
        MaterialField::Uom,
        MaterialField::Availability,
        MaterialField::Pr,
        MaterialField::Po,
        MaterialField::Note,
        MaterialField::DateChange,
    ];

    /// JSON上のキー
    pub fn key(&self) -> &'static str {
        match self {
            MaterialField::PartNo => "partNo",
            MaterialField::Description => "description",
            MaterialField::Qty => "qty",
            MaterialField::Uom => "uom",
            MaterialField::Availability => "availability",
            MaterialField::Pr => "pr",
            MaterialField::Po => "po",
            MaterialField::Note => "note",
            MaterialField::DateChange => "dateChange",
        }
    }

    /// 表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            MaterialField::PartNo => "Part No",
            MaterialField::Description => "Description",
            MaterialField::Qty => "Qty",
            MaterialField::Uom => "UoM",
            MaterialField::Availability => "Avail",
            MaterialField::Pr => "PR",
            MaterialField::Po => "PO",
            MaterialField::Note => "Note",
            MaterialField::DateChange => "Date",
        }
    }
}

impl fmt::Display for MaterialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MaterialField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// 点検所見
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingRecord {
    /// 所見名（資材マップのキー）
    #[serde(default, deserialize_with = "lenient_string")]
    pub finding: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    /// 必要な処置
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: String,

    /// 写真URL
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
}

/// 一般情報（ラベル → 表示値、バックエンドのキー順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralData(Vec<(String, String)>);

impl GeneralData {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GeneralData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GeneralData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GeneralDataVisitor;

        impl<'de> Visitor<'de> for GeneralDataVisitor {
            type Value = GeneralData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to display value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, LenientString(value))) = access.next_entry::<String, LenientString>()? {
                    entries.push((key, value));
                }
                Ok(GeneralData(entries))
            }
        }

        deserializer.deserialize_map(GeneralDataVisitor)
    }
}

/// GETレスポンス全体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub general_data: GeneralData,
    pub findings: Vec<FindingRecord>,
    /// 所見名 → 最後に同期された資材リスト
    pub materials_by_finding: BTreeMap<String, Vec<MaterialRecord>>,
}

impl DashboardPayload {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn finding(&self, index: usize) -> Option<&FindingRecord> {
        self.findings.get(index)
    }

    /// 所見名から位置を検索
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.findings.iter().position(|f| f.finding == name)
    }

    /// 所見の資材リスト（未登録なら空）
    pub fn materials_for(&self, name: &str) -> &[MaterialRecord] {
        self.materials_by_finding
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// POSTリクエスト本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub finding_name: String,
    pub materials: Vec<MaterialRecord>,
}

/// POSTレスポンス本文
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
}

struct LenientString(String);

impl<'de> Deserialize<'de> for LenientString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_string(deserializer).map(LenientString)
    }
}

/// 文字列・数値・真偽値・nullをテキストとして受け取る
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<String, D2::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_material_defaults() {
        let m = MaterialRecord::empty_dated("2024-05-01");
        assert_eq!(m.uom, "EA");
        assert_eq!(m.date_change, "2024-05-01");
        assert_eq!(m.part_no, "");
        assert_eq!(m.qty, "");
        assert_eq!(m.note, "");
    }

    #[test]
    fn test_empty_material_uses_iso_date() {
        let m = MaterialRecord::empty();
        assert_eq!(m.date_change.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&m.date_change, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_material_wire_keys() {
        let m = MaterialRecord {
            part_no: "A1".into(),
            date_change: "2024-01-02".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["partNo"], "A1");
        assert_eq!(value["dateChange"], "2024-01-02");
        for field in MaterialField::ALL {
            assert!(value.get(field.key()).is_some(), "missing key {}", field.key());
        }
    }

    #[test]
    fn test_material_lenient_cells() {
        let m: MaterialRecord = serde_json::from_value(json!({
            "partNo": 12345,
            "qty": 2.5,
            "uom": null,
            "availability": true
        }))
        .unwrap();
        assert_eq!(m.part_no, "12345");
        assert_eq!(m.qty, "2.5");
        assert_eq!(m.uom, "");
        assert_eq!(m.availability, "true");
        assert_eq!(m.note, "");
    }

    #[test]
    fn test_material_rejects_nested_cell() {
        let result = serde_json::from_value::<MaterialRecord>(json!({ "qty": [1, 2] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_field_changes_only_target() {
        let m = MaterialRecord::empty_dated("2024-05-01");
        let next = m.with_field(MaterialField::Qty, "7");
        assert_eq!(next.qty, "7");
        assert_eq!(next.get(MaterialField::Uom), "EA");
        assert_eq!(next.with_field(MaterialField::Qty, ""), m);
    }

    #[test]
    fn test_field_from_key() {
        assert_eq!("partNo".parse::<MaterialField>().unwrap(), MaterialField::PartNo);
        assert_eq!("dateChange".parse::<MaterialField>().unwrap(), MaterialField::DateChange);
        assert!(matches!(
            "part_no".parse::<MaterialField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_general_data_preserves_order() {
        let payload = DashboardPayload::from_json(
            r#"{
                "generalData": {"Tail": "PK-ABC", "Date": "2024-03-01", "Hours": 1234, "Station": null},
                "findings": [],
                "materialsByFinding": {}
            }"#,
        )
        .unwrap();
        let labels: Vec<&str> = payload.general_data.iter().map(|(k, _)| k).collect();
        assert_eq!(labels, vec!["Tail", "Date", "Hours", "Station"]);
        assert_eq!(payload.general_data.get("Hours"), Some("1234"));
        assert_eq!(payload.general_data.get("Station"), Some(""));
    }

    #[test]
    fn test_payload_lookup() {
        let payload = DashboardPayload::from_json(
            r#"{
                "generalData": {},
                "findings": [
                    {"finding": "F-01", "description": "Corrosion", "action": "Replace", "image": "https://img/1"},
                    {"finding": "F-02"}
                ],
                "materialsByFinding": {"F-01": [{"partNo": "A1", "qty": "2"}]}
            }"#,
        )
        .unwrap();
        assert_eq!(payload.find_index("F-02"), Some(1));
        assert_eq!(payload.finding(1).unwrap().action, "");
        assert_eq!(payload.materials_for("F-01").len(), 1);
        assert!(payload.materials_for("F-02").is_empty());
    }

    #[test]
    fn test_payload_missing_sections_is_error() {
        assert!(DashboardPayload::from_json(r#"{"generalData": {}, "findings": []}"#).is_err());
        assert!(DashboardPayload::from_json(r#"{"generalData": {}, "materialsByFinding": {}}"#).is_err());
        assert!(DashboardPayload::from_json(r#"{"findings": "nope", "generalData": {}, "materialsByFinding": {}}"#).is_err());
    }

    #[test]
    fn test_save_request_shape() {
        let request = SaveRequest {
            finding_name: "F-01".into(),
            materials: vec![MaterialRecord::empty_dated("2024-05-01")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["findingName"], "F-01");
        assert_eq!(value["materials"][0]["uom"], "EA");
    }
}
