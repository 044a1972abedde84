//! Roll-number lookup against the cached roster.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::RosterCache;
use crate::models::{InvalidateResult, LookupResult, Roster, Sheet, StudentRecord};
use crate::quotes::QuoteSelector;

/// Width roll numbers are zero-padded to before comparison.
pub const ROLL_NUMBER_WIDTH: usize = 8;

/// Trim, then left-pad with '0' to `ROLL_NUMBER_WIDTH` characters.
/// Longer values are returned trimmed but otherwise unchanged.
pub fn normalize_roll_number(raw: &str) -> String {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len >= ROLL_NUMBER_WIDTH {
        return trimmed.to_string();
    }
    let mut padded = "0".repeat(ROLL_NUMBER_WIDTH - len);
    padded.push_str(trimmed);
    padded
}

/// First record, in sheet-then-row order, whose normalized registration
/// number equals `normalized`.
pub fn find_record<'a>(roster: &'a Roster, normalized: &str) -> Option<(&'a Sheet, &'a StudentRecord)> {
    roster.sheets().iter().find_map(|sheet| {
        debug!(sheet = %sheet.name, "Searching sheet");
        sheet
            .records
            .iter()
            .find(|r| normalize_roll_number(&r.registration_number) == normalized)
            .map(|record| (sheet, record))
    })
}

/// Entry point for presenters: look up a roll number, or bust the cache.
#[derive(Debug)]
pub struct LookupService {
    cache: Arc<RosterCache>,
    quotes: QuoteSelector,
}

impl LookupService {
    pub fn new(cache: Arc<RosterCache>) -> Self {
        Self {
            cache,
            quotes: QuoteSelector::new(),
        }
    }

    /// Replace the quote selector, e.g. with a seeded one in tests.
    pub fn with_quotes(mut self, quotes: QuoteSelector) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn cache(&self) -> &RosterCache {
        &self.cache
    }

    /// Look up a raw roll number. Load failures come back as
    /// `LookupResult::LoadError`; this never returns an error.
    pub async fn find_status(&self, raw_roll_number: &str) -> LookupResult {
        let roster = match self.cache.get().await {
            Ok(roster) => roster,
            Err(e) => {
                error!(error = %e, "Failed to load roster for lookup");
                return LookupResult::load_error(e.to_string());
            }
        };

        let normalized = normalize_roll_number(raw_roll_number);
        debug!(roll_number = %normalized, "Searching for roll number");

        match find_record(&roster, &normalized) {
            Some((sheet, record)) => {
                info!(roll_number = %normalized, sheet = %sheet.name, "Student found");
                LookupResult::Found {
                    registration_number: record.registration_number.clone(),
                    sheet_name: sheet.name.clone(),
                    exam_result: record.exam_result.clone(),
                    message: self.quotes.pick_message(true),
                }
            }
            None => {
                info!(roll_number = %normalized, "Student not found in any sheet");
                LookupResult::NotFound {
                    registration_number: normalized,
                    message: self.quotes.pick_message(false),
                }
            }
        }
    }

    /// Clear the cached roster. Does not reload; the next lookup does.
    pub fn invalidate_roster(&self) -> InvalidateResult {
        self.cache.invalidate();
        InvalidateResult::refreshed()
    }
}
