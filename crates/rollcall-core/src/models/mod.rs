//! Data models for roster lookups.
//!
//! - `StudentRecord`, `Sheet`, `Roster`: the cleaned roster as loaded from a source
//! - `LookupResult`, `InvalidateResult`: what the lookup service hands back to presenters

pub mod result;
pub mod roster;

pub use result::{InvalidateResult, LookupResult, LOAD_ERROR_MESSAGE};
pub use roster::{Roster, Sheet, StudentRecord};
