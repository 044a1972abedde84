//! End-to-end lookups through config, local JSON source, cache and service.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rollcall_core::source::LocalJsonSource;
use rollcall_core::{
    Config, LookupResult, LookupService, QuoteSelector, RosterCache, RosterFields, SourceKind,
};
use tempfile::NamedTempFile;

const ROSTER_JSON: &str = r#"{
    "SheetA": [
        {"Student_Registration_Number": "00123456", "Quarter_1_Exam_Result": "A"},
        {"Student_Registration_Number": "  00000042  ", "Quarter_1_Exam_Result": "B"}
    ],
    "SheetB": [
        {"Student_Registration_Number": "42", "Quarter_1_Exam_Result": "C"},
        {"Student_Registration_Number": "777", "Quarter_1_Exam_Result": "Pass"}
    ]
}"#;

fn roster_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes()).expect("failed to write roster");
    file
}

fn service_for(file: &NamedTempFile) -> LookupService {
    let source = Arc::new(LocalJsonSource::new(file.path(), RosterFields::default()));
    let cache = Arc::new(RosterCache::new(source, Duration::from_secs(3600)));
    LookupService::new(cache).with_quotes(QuoteSelector::seeded(3))
}

#[tokio::test]
async fn test_lookup_from_json_file() {
    let file = roster_file(ROSTER_JSON);
    let service = service_for(&file);

    match service.find_status("123456").await {
        LookupResult::Found {
            registration_number,
            sheet_name,
            ..
        } => {
            assert_eq!(registration_number, "00123456");
            assert_eq!(sheet_name, "SheetA");
        }
        other => panic!("expected Found, got {:?}", other),
    }

    match service.find_status("777").await {
        LookupResult::Found {
            registration_number,
            sheet_name,
            exam_result,
            ..
        } => {
            assert_eq!(registration_number, "777");
            assert_eq!(sheet_name, "SheetB");
            assert_eq!(exam_result, "Pass");
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_roll_numbers_first_sheet_wins() {
    let file = roster_file(ROSTER_JSON);
    let service = service_for(&file);

    match service.find_status("42").await {
        LookupResult::Found {
            registration_number,
            sheet_name,
            exam_result,
            ..
        } => {
            assert_eq!(registration_number, "00000042");
            assert_eq!(sheet_name, "SheetA");
            assert_eq!(exam_result, "B");
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_and_empty_input() {
    let file = roster_file(ROSTER_JSON);
    let service = service_for(&file);

    let result = service.find_status("999999").await;
    assert_eq!(result.status_label(), "Fail");
    assert_eq!(result.registration_number(), Some("00999999"));

    let result = service.find_status("").await;
    assert_eq!(result.registration_number(), Some("00000000"));
}

#[tokio::test]
async fn test_invalidate_picks_up_new_file_contents() {
    let file = roster_file(ROSTER_JSON);
    let service = service_for(&file);
    assert!(!service.find_status("31337").await.is_found());

    let updated = r#"{"Late": [{"Student_Registration_Number": "31337", "Quarter_1_Exam_Result": "Pass"}]}"#;
    std::fs::write(file.path(), updated).unwrap();

    // Still served from cache until invalidated.
    assert!(!service.find_status("31337").await.is_found());

    assert!(service.invalidate_roster().success);
    assert!(service.find_status("31337").await.is_found());
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        source_kind: SourceKind::JsonFile,
        source_location: dir.path().join("absent.json").display().to_string(),
        ..Config::default()
    };
    let service = config.build_service().unwrap();

    let result = service.find_status("123456").await;
    assert!(result.is_load_error());
    assert_eq!(result.user_message(), "An error occurred while fetching the data");
    assert!(service.cache().cached_age().is_none());
}

#[tokio::test]
async fn test_malformed_file_is_load_error() {
    let file = roster_file(r#"{"SheetA": "not rows"}"#);
    let service = service_for(&file);
    assert!(service.find_status("1").await.is_load_error());
}
