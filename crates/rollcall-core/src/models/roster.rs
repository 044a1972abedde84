use serde::{Deserialize, Serialize};

/// A single roster row after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub registration_number: String,
    pub exam_result: String,
}

impl StudentRecord {
    /// Build a record from raw field values.
    /// Both values are trimmed; returns None if either ends up empty.
    pub fn from_raw(registration_number: &str, exam_result: &str) -> Option<Self> {
        let registration_number = registration_number.trim();
        let exam_result = exam_result.trim();
        if registration_number.is_empty() || exam_result.is_empty() {
            return None;
        }
        Some(Self {
            registration_number: registration_number.to_string(),
            exam_result: exam_result.to_string(),
        })
    }
}

/// A named group of records, one per worksheet or top-level JSON key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub records: Vec<StudentRecord>,
}

/// The full roster. Sheet order is the source order and is the scan order
/// used by lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    sheets: Vec<Sheet>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet at the end. A sheet with the same name keeps its
    /// position but has its records replaced.
    pub fn insert_sheet(&mut self, name: impl Into<String>, records: Vec<StudentRecord>) {
        let name = name.into();
        match self.sheets.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.records = records,
            None => self.sheets.push(Sheet { name, records }),
        }
    }

    /// Builder form of `insert_sheet`.
    pub fn with_sheet(mut self, name: impl Into<String>, records: Vec<StudentRecord>) -> Self {
        self.insert_sheet(name, records);
        self
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn record_count(&self) -> usize {
        self.sheets.iter().map(|s| s.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
