//! Roster loading from a single configured source.
//!
//! Every source implements `RosterSource` and produces a cleaned `Roster`:
//! - `RemoteJsonSource`: HTTP GET of a JSON document
//! - `LocalJsonSource`: a JSON file on disk with the same shape
//! - `SpreadsheetFileSource`: an xlsx/xls/ods workbook, one worksheet per sheet
//!
//! Rows missing either required field are dropped. Structural problems are
//! reported as `LoadError::Parse`, never as an empty roster.

pub mod error;
pub mod json;
pub mod remote;
pub mod spreadsheet;

use async_trait::async_trait;

use crate::models::Roster;

pub use error::LoadError;
pub use json::LocalJsonSource;
pub use remote::RemoteJsonSource;
pub use spreadsheet::SpreadsheetFileSource;

/// Default column/key holding the roll number
pub const DEFAULT_REGISTRATION_FIELD: &str = "Student_Registration_Number";

/// Default column/key holding the exam result
pub const DEFAULT_RESULT_FIELD: &str = "Quarter_1_Exam_Result";

/// Names of the two required fields in each source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterFields {
    pub registration: String,
    pub result: String,
}

impl RosterFields {
    pub fn new(registration: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            registration: registration.into(),
            result: result.into(),
        }
    }
}

impl Default for RosterFields {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRATION_FIELD, DEFAULT_RESULT_FIELD)
    }
}

/// A backing store the roster can be loaded from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Read and clean the full roster.
    async fn load(&self) -> Result<Roster, LoadError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}
