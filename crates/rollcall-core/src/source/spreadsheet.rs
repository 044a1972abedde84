//! Roster stored in a local workbook (xlsx, xls, xlsb or ods).
//!
//! Each worksheet is one roster sheet. The first row is the header and the
//! two required columns are located by name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, warn};

use crate::models::{Roster, StudentRecord};

use super::{LoadError, RosterFields, RosterSource};

/// Largest float that still converts to an integer without losing digits.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone)]
pub struct SpreadsheetFileSource {
    path: PathBuf,
    fields: RosterFields,
}

impl SpreadsheetFileSource {
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
impl RosterSource for SpreadsheetFileSource {
    async fn load(&self) -> Result<Roster, LoadError> {
        let path = self.path.clone();
        let fields = self.fields.clone();
        tokio::task::spawn_blocking(move || read_workbook(&path, &fields))
            .await
            .map_err(|e| LoadError::SourceUnavailable(format!("spreadsheet reader task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }
}

fn read_workbook(path: &Path, fields: &RosterFields) -> Result<Roster, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceUnavailable(format!(
            "spreadsheet not found: {}",
            path.display()
        )));
    }

    let mut workbook = open_workbook_auto(path)?;
    let mut roster = Roster::new();

    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        let records = match records_from_rows(range.rows(), fields) {
            Some(records) => records,
            None => {
                warn!(
                    sheet = %sheet_name,
                    registration = %fields.registration,
                    result = %fields.result,
                    "Worksheet header is missing a required column"
                );
                Vec::new()
            }
        };
        debug!(sheet = %sheet_name, kept = records.len(), "Read worksheet");
        roster.insert_sheet(sheet_name, records);
    }

    Ok(roster)
}

/// Turn worksheet rows (header first) into cleaned records.
/// Returns None when the header lacks either required column.
pub(crate) fn records_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
    fields: &RosterFields,
) -> Option<Vec<StudentRecord>> {
    let header = rows.next()?;
    let column = |name: &str| {
        header
            .iter()
            .position(|cell| cell_to_string(cell).trim() == name)
    };
    let registration_col = column(&fields.registration)?;
    let result_col = column(&fields.result)?;

    let records = rows
        .filter_map(|row| {
            let registration = row.get(registration_col).map(cell_to_string)?;
            let result = row.get(result_col).map(cell_to_string)?;
            StudentRecord::from_raw(&registration, &result)
        })
        .collect();

    Some(records)
}

/// Render a cell the way it reads in the sheet.
/// Whole-number floats drop the fractional part so 123456.0 matches "123456".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
