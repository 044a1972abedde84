//! JSON roster documents and the local JSON file source.
//!
//! The document shape is `{ "<sheet>": [ { "<registration>": ..., "<result>": ... }, ... ] }`.
//! Field values may be strings or numbers; anything else counts as missing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::models::{Roster, StudentRecord};

use super::{LoadError, RosterFields, RosterSource};

/// Parse a roster document from text.
pub fn parse_roster(text: &str, fields: &RosterFields) -> Result<Roster, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    roster_from_value(value, fields)
}

/// Build a roster from an already-decoded JSON document.
pub fn roster_from_value(value: Value, fields: &RosterFields) -> Result<Roster, LoadError> {
    let Value::Object(sheets) = value else {
        return Err(LoadError::Parse(format!(
            "expected an object of sheets, found {}",
            value_kind(&value)
        )));
    };

    let mut roster = Roster::new();
    for (sheet_name, rows) in sheets {
        let Value::Array(rows) = rows else {
            return Err(LoadError::Parse(format!(
                "sheet '{}' is {}, expected an array of rows",
                sheet_name,
                value_kind(&rows)
            )));
        };

        let total = rows.len();
        let records: Vec<StudentRecord> = rows
            .iter()
            .filter_map(|row| record_from_row(row, fields))
            .collect();
        debug!(
            sheet = %sheet_name,
            rows = total,
            kept = records.len(),
            "Cleaned sheet"
        );
        roster.insert_sheet(sheet_name, records);
    }

    Ok(roster)
}

fn record_from_row(row: &Value, fields: &RosterFields) -> Option<StudentRecord> {
    let registration = field_as_string(row.get(&fields.registration)?)?;
    let result = field_as_string(row.get(&fields.result)?)?;
    StudentRecord::from_raw(&registration, &result)
}

fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Roster stored as a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct LocalJsonSource {
    path: PathBuf,
    fields: RosterFields,
}

impl LocalJsonSource {
    pub fn new(path: impl Into<PathBuf>, fields: RosterFields) -> Self {
        Self {
            path: path.into(),
            fields,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RosterSource for LocalJsonSource {
    async fn load(&self) -> Result<Roster, LoadError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            LoadError::SourceUnavailable(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        parse_roster(&contents, &self.fields)
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RosterFields {
        RosterFields::default()
    }

    #[test]
    fn test_parse_keeps_sheet_order() {
        let text = r#"{
            "Zulu": [{"Student_Registration_Number": "1", "Quarter_1_Exam_Result": "Pass"}],
            "Alpha": [{"Student_Registration_Number": "2", "Quarter_1_Exam_Result": "Pass"}],
            "Mike": []
        }"#;
        let roster = parse_roster(text, &fields()).unwrap();
        let names: Vec<&str> = roster.sheets().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    }

    #[test]
    fn test_parse_drops_incomplete_rows() {
        let text = r#"{
            "Sheet1": [
                {"Student_Registration_Number": " 00123456 ", "Quarter_1_Exam_Result": " Pass "},
                {"Student_Registration_Number": "", "Quarter_1_Exam_Result": "Pass"},
                {"Student_Registration_Number": "00000002", "Quarter_1_Exam_Result": "   "},
                {"Student_Registration_Number": "00000003"},
                {"Student_Registration_Number": null, "Quarter_1_Exam_Result": "Pass"},
                "not a row",
                {"Student_Registration_Number": 654321, "Quarter_1_Exam_Result": "Pass"}
            ]
        }"#;
        let roster = parse_roster(text, &fields()).unwrap();
        let records = &roster.sheet("Sheet1").unwrap().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].registration_number, "00123456");
        assert_eq!(records[0].exam_result, "Pass");
        assert_eq!(records[1].registration_number, "654321");
    }

    #[test]
    fn test_parse_uses_configured_field_names() {
        let text = r#"{"S": [{"Student_Registration_Number": "7", "Quarter 1 Exam Result": "Pass"}]}"#;
        let spaced = RosterFields::new("Student_Registration_Number", "Quarter 1 Exam Result");

        assert_eq!(parse_roster(text, &spaced).unwrap().record_count(), 1);
        assert_eq!(parse_roster(text, &fields()).unwrap().record_count(), 0);
    }

    #[test]
    fn test_parse_rejects_non_object_document() {
        let err = parse_roster("[1, 2, 3]", &fields()).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_parse_rejects_non_array_sheet() {
        let err = parse_roster(r#"{"Sheet1": {"oops": true}}"#, &fields()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("Sheet1"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_roster("{\"Sheet1\": [", &fields()).unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_local_json_missing_file_is_unavailable() {
        let source = LocalJsonSource::new("/definitely/not/here/students.json", fields());
        let err = source.load().await.unwrap_err();
        assert!(err.is_source_unavailable());
    }
}
