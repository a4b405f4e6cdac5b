//! Validation of an authored source record against the metadata schema.
//!
//! The record is the JSON serialization of the data-entry template's
//! sheets: named sections, each a table of rows. Section and column names
//! are the Japanese literals of the template; the validator checks the
//! required basic-info fields and the step sequence, and collects a
//! summary for the promotion step. It never mutates the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SECTION_BASIC_INFO: &str = "基本情報";
pub const SECTION_SEARCH: &str = "検索分類";
pub const SECTION_STEPS: &str = "作業ステップ";
pub const SECTION_CUTTING: &str = "切削条件";
pub const SECTION_QUALITY: &str = "品質チェック";
pub const SECTION_TROUBLE: &str = "ヒヤリハット";
pub const SECTION_RELATED: &str = "関連情報";
pub const SECTION_REVISIONS: &str = "改訂履歴";

pub const COL_ITEM: &str = "項目";
pub const COL_VALUE: &str = "値";
pub const COL_STEP_NUMBER: &str = "ステップ番号";

pub const FIELD_DRAWING_NUMBER: &str = "図面番号";
pub const FIELD_KEYWORDS: &str = "キーワード";
pub const FIELD_DIFFICULTY: &str = "難易度";
pub const FIELD_ESTIMATED_TIME: &str = "推定時間";

/// Fields of the basic-info section that must be present and non-blank.
pub const REQUIRED_BASIC_FIELDS: [&str; 6] = [
    FIELD_DRAWING_NUMBER,
    "会社ID",
    "会社名",
    "製品ID",
    "製品名",
    "図面タイトル",
];

/// Optional sections whose row counts land in the summary.
const COUNTED_SECTIONS: [(&str, &str); 5] = [
    (SECTION_CUTTING, "cutting_conditions_count"),
    (SECTION_QUALITY, "quality_check_count"),
    (SECTION_TROUBLE, "troubleshooting_count"),
    (SECTION_RELATED, "related_info_count"),
    (SECTION_REVISIONS, "revision_count"),
];

pub type Row = BTreeMap<String, Value>;

/// An ingested source record: named sections, each a table of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    sections: BTreeMap<String, Vec<Row>>,
}

impl SourceRecord {
    pub fn section(&self, name: &str) -> Option<&[Row]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Look up `値` of the first row whose `項目` equals `item`.
    fn lookup<'a>(rows: &'a [Row], item: &str) -> Option<&'a Value> {
        rows.iter()
            .find(|row| row.get(COL_ITEM).and_then(Value::as_str) == Some(item))
            .and_then(|row| row.get(COL_VALUE))
    }
}

/// Outcome of one validation run. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: BTreeMap<String, Value>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validate a source record. Pure: the record is never mutated, and every
/// check runs regardless of earlier failures.
pub fn validate(record: &SourceRecord) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_basic_info(record, &mut report);
    check_search_info(record, &mut report);
    check_steps(record, &mut report);

    for (section, key) in COUNTED_SECTIONS {
        if let Some(rows) = record.section(section) {
            report.summary.insert(key.to_string(), rows.len().into());
        }
    }

    report
}

fn check_basic_info(record: &SourceRecord, report: &mut ValidationReport) {
    let rows = record.section(SECTION_BASIC_INFO).unwrap_or_default();

    for field in REQUIRED_BASIC_FIELDS {
        match SourceRecord::lookup(rows, field) {
            None => report.error(format!("required field '{}' is missing", field)),
            Some(value) if cell_text(value).is_empty() => {
                report.error(format!("required field '{}' is blank", field))
            }
            Some(value) => {
                if field == FIELD_DRAWING_NUMBER {
                    report
                        .summary
                        .insert("drawing_number".to_string(), cell_text(value).into());
                }
            }
        }
    }
}

fn check_search_info(record: &SourceRecord, report: &mut ValidationReport) {
    let Some(rows) = record.section(SECTION_SEARCH) else {
        return;
    };

    if let Some(value) = SourceRecord::lookup(rows, FIELD_KEYWORDS) {
        let keywords: Vec<Value> = cell_text(value)
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Value::from)
            .collect();
        if !keywords.is_empty() {
            report
                .summary
                .insert("keywords".to_string(), Value::Array(keywords));
        }
    }
    for (field, key) in [
        (FIELD_DIFFICULTY, "difficulty"),
        (FIELD_ESTIMATED_TIME, "estimated_time"),
    ] {
        if let Some(value) = SourceRecord::lookup(rows, field) {
            let text = cell_text(value);
            if !text.is_empty() {
                report.summary.insert(key.to_string(), text.into());
            }
        }
    }
}

fn check_steps(record: &SourceRecord, report: &mut ValidationReport) {
    let Some(rows) = record.section(SECTION_STEPS) else {
        report.error(format!("required section '{}' is missing", SECTION_STEPS));
        return;
    };

    report
        .summary
        .insert("step_count".to_string(), rows.len().into());

    let numbers: Vec<Option<u64>> = rows
        .iter()
        .map(|row| row.get(COL_STEP_NUMBER).and_then(Value::as_u64))
        .collect();
    let contiguous = numbers
        .iter()
        .enumerate()
        .all(|(i, n)| *n == Some(i as u64 + 1));

    if !contiguous {
        let shown: Vec<String> = rows
            .iter()
            .map(|row| match row.get(COL_STEP_NUMBER) {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) => s.clone(),
                _ => "?".to_string(),
            })
            .collect();
        report.warning(format!(
            "step numbers are not contiguous: [{}]",
            shown.join(", ")
        ));
    }
}

/// Trimmed text of a cell. Numbers render decimally; null and non-scalar
/// values read as blank.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> SourceRecord {
        serde_json::from_value(value).unwrap()
    }

    fn basic_info_rows(fields: &[(&str, &str)]) -> serde_json::Value {
        json!(fields
            .iter()
            .map(|(item, value)| json!({ "項目": item, "値": value }))
            .collect::<Vec<_>>())
    }

    fn complete_basic_info() -> serde_json::Value {
        basic_info_rows(&[
            ("図面番号", "12750800122"),
            ("会社ID", "C01"),
            ("会社名", "サンエイ"),
            ("製品ID", "P01"),
            ("製品名", "リテーナ"),
            ("図面タイトル", "リテーナ 加工図"),
        ])
    }

    fn steps_rows(numbers: &[u64]) -> serde_json::Value {
        json!(numbers
            .iter()
            .map(|n| json!({ "ステップ番号": n, "作業内容": "加工" }))
            .collect::<Vec<_>>())
    }

    #[test]
    fn valid_record_passes_with_summary() {
        let record = record(json!({
            "基本情報": complete_basic_info(),
            "検索分類": basic_info_rows(&[
                ("キーワード", "リテーナ, 旋盤, SUS304"),
                ("難易度", "中"),
                ("推定時間", "2時間"),
            ]),
            "作業ステップ": steps_rows(&[1, 2, 3]),
            "切削条件": [{ "工程": "荒加工" }],
        }));

        let report = validate(&record);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.summary["drawing_number"], "12750800122");
        assert_eq!(report.summary["step_count"], 3);
        assert_eq!(report.summary["cutting_conditions_count"], 1);
        assert_eq!(report.summary["difficulty"], "中");
        assert_eq!(
            report.summary["keywords"],
            json!(["リテーナ", "旋盤", "SUS304"])
        );
    }

    #[test]
    fn missing_drawing_number_is_an_error_naming_the_field() {
        let record = record(json!({
            "基本情報": basic_info_rows(&[
                ("会社ID", "C01"),
                ("会社名", "サンエイ"),
                ("製品ID", "P01"),
                ("製品名", "リテーナ"),
                ("図面タイトル", "リテーナ 加工図"),
            ]),
            "作業ステップ": steps_rows(&[1]),
        }));

        let report = validate(&record);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("図面番号"));
        assert!(report.errors[0].contains("missing"));
    }

    #[test]
    fn blank_field_reports_distinct_message() {
        let record = record(json!({
            "基本情報": basic_info_rows(&[
                ("図面番号", "  "),
                ("会社ID", "C01"),
                ("会社名", "サンエイ"),
                ("製品ID", "P01"),
                ("製品名", "リテーナ"),
                ("図面タイトル", "リテーナ 加工図"),
            ]),
            "作業ステップ": steps_rows(&[1]),
        }));

        let report = validate(&record);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("図面番号"));
        assert!(report.errors[0].contains("blank"));
    }

    #[test]
    fn step_gap_is_a_warning_not_an_error() {
        let record = record(json!({
            "基本情報": complete_basic_info(),
            "作業ステップ": steps_rows(&[1, 2, 4]),
        }));

        let report = validate(&record);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("[1, 2, 4]"));
    }

    #[test]
    fn duplicate_and_disordered_steps_warn() {
        for numbers in [&[1, 1, 2][..], &[2, 1, 3][..]] {
            let record = record(json!({
                "基本情報": complete_basic_info(),
                "作業ステップ": steps_rows(numbers),
            }));
            let report = validate(&record);
            assert!(report.is_valid);
            assert_eq!(report.warnings.len(), 1, "numbers {:?}", numbers);
        }
    }

    #[test]
    fn missing_basic_info_section_reports_every_required_field() {
        let record = record(json!({
            "作業ステップ": steps_rows(&[1]),
        }));

        let report = validate(&record);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), REQUIRED_BASIC_FIELDS.len());
    }

    #[test]
    fn missing_steps_section_is_a_single_error() {
        let record = record(json!({
            "基本情報": complete_basic_info(),
        }));

        let report = validate(&record);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("作業ステップ"));
        assert!(!report.summary.contains_key("step_count"));
    }

    #[test]
    fn optional_sections_absent_produce_no_errors_or_entries() {
        let record = record(json!({
            "基本情報": complete_basic_info(),
            "作業ステップ": steps_rows(&[1, 2]),
        }));

        let report = validate(&record);
        assert!(report.is_valid);
        assert!(!report.summary.contains_key("keywords"));
        assert!(!report.summary.contains_key("cutting_conditions_count"));
    }

    #[test]
    fn numeric_cells_read_as_text() {
        let mut rows = basic_info_rows(&[
            ("会社ID", "C01"),
            ("会社名", "サンエイ"),
            ("製品ID", "P01"),
            ("製品名", "リテーナ"),
            ("図面タイトル", "リテーナ 加工図"),
        ])
        .as_array()
        .unwrap()
        .clone();
        rows.push(json!({ "項目": "図面番号", "値": 12750800122u64 }));

        let record = record(json!({
            "基本情報": rows,
            "作業ステップ": steps_rows(&[1]),
        }));

        let report = validate(&record);
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert_eq!(report.summary["drawing_number"], "12750800122");
    }
}
