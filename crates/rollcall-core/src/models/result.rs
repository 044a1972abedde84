use serde::{Deserialize, Serialize};

/// Message shown to users when the roster could not be loaded.
/// Internal error details are logged, never shown.
pub const LOAD_ERROR_MESSAGE: &str = "An error occurred while fetching the data";

/// Message returned after the roster cache has been cleared.
pub const INVALIDATE_MESSAGE: &str = "Cache refreshed successfully";

/// Outcome of a roll-number lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    /// The roll number is on the roster. `registration_number` is the value
    /// stored in the roster, not the caller's input.
    Found {
        registration_number: String,
        sheet_name: String,
        exam_result: String,
        message: String,
    },
    /// No sheet contains the roll number. `registration_number` is the
    /// normalized input.
    NotFound {
        registration_number: String,
        message: String,
    },
    /// The roster could not be loaded. `message` is the generic text shown to
    /// users; `detail` is the internal description and is never serialized.
    LoadError {
        message: String,
        #[serde(skip_serializing, default)]
        #[cfg_attr(feature = "ts", ts(skip))]
        detail: String,
    },
}

impl LookupResult {
    /// Load failure carrying the generic user message.
    pub fn load_error(detail: impl Into<String>) -> Self {
        LookupResult::LoadError {
            message: LOAD_ERROR_MESSAGE.to_string(),
            detail: detail.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }

    pub fn is_load_error(&self) -> bool {
        matches!(self, LookupResult::LoadError { .. })
    }

    /// Short status label for display
    pub fn status_label(&self) -> &'static str {
        match self {
            LookupResult::Found { .. } => "Pass",
            LookupResult::NotFound { .. } => "Fail",
            LookupResult::LoadError { .. } => "Error",
        }
    }

    pub fn registration_number(&self) -> Option<&str> {
        match self {
            LookupResult::Found { registration_number, .. }
            | LookupResult::NotFound { registration_number, .. } => Some(registration_number),
            LookupResult::LoadError { .. } => None,
        }
    }

    /// Text that is safe to show to the end user.
    pub fn user_message(&self) -> &str {
        match self {
            LookupResult::Found { message, .. }
            | LookupResult::NotFound { message, .. }
            | LookupResult::LoadError { message, .. } => message,
        }
    }
}

/// Response to an explicit cache-bust request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct InvalidateResult {
    pub success: bool,
    pub message: String,
}

impl InvalidateResult {
    pub fn refreshed() -> Self {
        Self {
            success: true,
            message: INVALIDATE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        let found = LookupResult::Found {
            registration_number: "00123456".into(),
            sheet_name: "SheetA".into(),
            exam_result: "A".into(),
            message: "well done".into(),
        };
        let not_found = LookupResult::NotFound {
            registration_number: "00999999".into(),
            message: "try again".into(),
        };
        let err = LookupResult::load_error("boom");

        assert_eq!(found.status_label(), "Pass");
        assert_eq!(not_found.status_label(), "Fail");
        assert_eq!(err.status_label(), "Error");
        assert_eq!(found.registration_number(), Some("00123456"));
        assert_eq!(err.registration_number(), None);
    }

    #[test]
    fn test_load_error_hides_detail() {
        let err = LookupResult::load_error("Roster source unavailable: connection refused");
        assert_eq!(err.user_message(), LOAD_ERROR_MESSAGE);
    }

    #[test]
    fn test_serialized_shape() {
        let not_found = LookupResult::NotFound {
            registration_number: "00000000".into(),
            message: "m".into(),
        };
        let json = serde_json::to_value(&not_found).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["registration_number"], "00000000");

        let err = LookupResult::load_error(
            "Roster source unavailable: Failed to read /srv/secret/students.json: Permission denied",
        );
        let text = serde_json::to_string(&err).unwrap();
        assert!(!text.contains("/srv/secret"));
        assert!(!text.contains("detail"));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["status"], "load_error");
        assert_eq!(json["message"], LOAD_ERROR_MESSAGE);
    }

    #[test]
    fn test_load_error_keeps_detail_for_logs() {
        let err = LookupResult::load_error("Roster could not be parsed: bad sheet");
        assert!(format!("{:?}", err).contains("bad sheet"));

        let json = r#"{"status": "load_error", "message": "An error occurred while fetching the data"}"#;
        let parsed: LookupResult = serde_json::from_str(json).unwrap();
        assert!(parsed.is_load_error());
    }

    #[test]
    fn test_invalidate_result() {
        let result = InvalidateResult::refreshed();
        assert!(result.success);
        assert_eq!(result.message, INVALIDATE_MESSAGE);
    }
}
