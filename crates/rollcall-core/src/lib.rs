//! Rollcall core - roster sources, caching, and result lookup.
//!
//! This crate answers one question: given a roll number, did the student
//! pass? The roster is loaded from a single configured source, kept in a
//! time-bounded in-memory cache, and scanned sheet by sheet.
//!
//! - `source`: roster loaders (remote JSON, local JSON, spreadsheet file)
//! - `cache`: the TTL cache in front of the loader
//! - `lookup`: roll-number normalization and the lookup service
//! - `quotes`: motivational messages attached to each result

pub mod cache;
pub mod config;
pub mod lookup;
pub mod models;
pub mod quotes;
pub mod source;
pub mod utils;

pub use cache::RosterCache;
pub use config::{Config, SourceKind};
pub use lookup::{normalize_roll_number, LookupService};
pub use models::{InvalidateResult, LookupResult, Roster, Sheet, StudentRecord};
pub use quotes::QuoteSelector;
pub use source::{LoadError, RosterFields, RosterSource};
