//! 端末表示
//!
//! 表示用の文字列を組み立てるだけで、出力は呼び出し側で行う。

use pir_dashboard_common::{EditSession, FindingRecord, GeneralData, MaterialField};

const PLACEHOLDER: &str = "—";

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
}

pub fn render_general(data: &GeneralData) -> String {
    let width = data.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    data.iter()
        .map(|(label, value)| format!("  {}  {}\n", pad(&label.to_uppercase(), width), or_placeholder(value)))
        .collect()
}

/// 所見一覧（番号は1始まり）
pub fn render_findings(findings: &[FindingRecord]) -> String {
    if findings.is_empty() {
        return "  (no findings)\n".to_string();
    }
    findings
        .iter()
        .enumerate()
        .map(|(i, f)| format!("  {:>3}. {}\n", i + 1, f.finding))
        .collect()
}

pub fn render_finding_detail(finding: &FindingRecord) -> String {
    format!(
        "Finding: {}\n  Observation:     {}\n  Required Action: {}\n  Image:           {}\n",
        finding.finding,
        or_placeholder(&finding.description),
        or_placeholder(&finding.action),
        or_placeholder(&finding.image),
    )
}

/// 資材表。編集モードでは選択列を付ける。
pub fn render_materials(session: &EditSession) -> String {
    let editing = session.is_editing();
    let materials = session.materials();

    let mut header: Vec<String> = Vec::new();
    if editing {
        header.push(if session.all_selected() { "[x]" } else { "[ ]" }.to_string());
    }
    header.push("#".to_string());
    header.extend(MaterialField::ALL.iter().map(|f| f.label().to_uppercase()));

    let rows: Vec<Vec<String>> = materials
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut row = Vec::new();
            if editing {
                row.push(if session.is_selected(i) { "[x]" } else { "[ ]" }.to_string());
            }
            row.push((i + 1).to_string());
            row.extend(MaterialField::ALL.iter().map(|f| or_placeholder(m.get(*f)).to_string()));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("  {}\n", line.trim_end())
    };

    let mut out = String::from("MATERIAL LIST (A5:J)\n");
    if editing {
        out.push_str(&format!("{} selected\n", session.selected_count()));
    }
    out.push_str(&format_row(&header));
    for row in &rows {
        out.push_str(&format_row(row));
    }
    if !editing {
        out.push_str(&format!(
            "Read-only mode enabled. {} records found.\n",
            materials.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pir_dashboard_common::MaterialRecord;

    fn fixed_today() -> String {
        "2024-05-01".to_string()
    }

    #[test]
    fn test_render_general_placeholder() {
        let data = GeneralData::new(vec![
            ("Tail".into(), "PK-ABC".into()),
            ("Station".into(), "".into()),
        ]);
        let out = render_general(&data);
        assert!(out.contains("TAIL     PK-ABC"));
        assert!(out.contains("STATION  —"));
    }

    #[test]
    fn test_render_findings_numbered() {
        let findings = vec![
            FindingRecord { finding: "F-01".into(), ..Default::default() },
            FindingRecord { finding: "F-02".into(), ..Default::default() },
        ];
        let out = render_findings(&findings);
        assert!(out.contains("1. F-01"));
        assert!(out.contains("2. F-02"));
        assert_eq!(render_findings(&[]), "  (no findings)\n");
    }

    #[test]
    fn test_render_materials_read_only() {
        let mut session = EditSession::with_date_source(fixed_today);
        session.seed(Some(&[MaterialRecord {
            part_no: "A1".into(),
            qty: "2".into(),
            uom: "EA".into(),
            ..Default::default()
        }]));
        let out = render_materials(&session);
        assert!(out.contains("PART NO"));
        assert!(out.contains("A1"));
        assert!(out.contains("Read-only mode enabled. 1 records found."));
        assert!(!out.contains("[ ]"));
    }

    #[test]
    fn test_render_materials_edit_mode() {
        let mut session = EditSession::with_date_source(fixed_today);
        session.seed(None);
        session.add_row();
        session.toggle_edit_mode();
        session.toggle_row(1).unwrap();

        let out = render_materials(&session);
        assert!(out.contains("1 selected"));
        assert!(out.contains("[x] | 2"));
        assert!(out.contains("[ ] | 1"));
        assert!(!out.contains("Read-only"));
    }
}
