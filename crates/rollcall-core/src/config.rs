//! Application configuration management.
//!
//! Settings are layered: built-in defaults, then the JSON file at
//! `~/.config/rollcall/config.json` if present, then `ROLLCALL_*`
//! environment variables. Callers may override the result further.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::{RosterCache, DEFAULT_TTL_SECS};
use crate::lookup::LookupService;
use crate::source::remote::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::source::{
    LocalJsonSource, RemoteJsonSource, RosterFields, RosterSource, SpreadsheetFileSource,
    DEFAULT_REGISTRATION_FIELD, DEFAULT_RESULT_FIELD,
};

/// Application name used for the config directory path
const APP_NAME: &str = "rollcall";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Roster location used when nothing is configured
const DEFAULT_SOURCE_LOCATION: &str = "data/students.json";

/// Which kind of backing store holds the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Remote,
    SpreadsheetFile,
    #[default]
    JsonFile,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "remote" | "url" | "http" => Ok(SourceKind::Remote),
            "spreadsheet_file" | "spreadsheet" | "xlsx" => Ok(SourceKind::SpreadsheetFile),
            "json_file" | "json" => Ok(SourceKind::JsonFile),
            other => Err(format!(
                "unknown source kind '{}' (expected remote, spreadsheet_file or json_file)",
                other
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Remote => write!(f, "remote"),
            SourceKind::SpreadsheetFile => write!(f, "spreadsheet_file"),
            SourceKind::JsonFile => write!(f, "json_file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_kind: SourceKind,
    /// URL for `remote`, filesystem path otherwise
    pub source_location: String,
    pub ttl_seconds: u64,
    pub registration_field: String,
    pub result_field: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_kind: SourceKind::default(),
            source_location: DEFAULT_SOURCE_LOCATION.to_string(),
            ttl_seconds: DEFAULT_TTL_SECS,
            registration_field: DEFAULT_REGISTRATION_FIELD.to_string(),
            result_field: DEFAULT_RESULT_FIELD.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load defaults, the config file (if any) and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Ok(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply `ROLLCALL_*` overrides read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(kind) = var("ROLLCALL_SOURCE_KIND") {
            self.source_kind = kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid ROLLCALL_SOURCE_KIND")?;
        }
        if let Some(location) = var("ROLLCALL_SOURCE_LOCATION") {
            self.source_location = location;
        }
        if let Some(ttl) = var("ROLLCALL_TTL_SECONDS") {
            self.ttl_seconds = ttl
                .trim()
                .parse()
                .with_context(|| format!("Invalid ROLLCALL_TTL_SECONDS: {}", ttl))?;
        }
        if let Some(field) = var("ROLLCALL_REGISTRATION_FIELD") {
            self.registration_field = field;
        }
        if let Some(field) = var("ROLLCALL_RESULT_FIELD") {
            self.result_field = field;
        }
        if let Some(timeout) = var("ROLLCALL_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid ROLLCALL_REQUEST_TIMEOUT_SECS: {}", timeout))?;
        }
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fields(&self) -> RosterFields {
        RosterFields::new(&self.registration_field, &self.result_field)
    }

    /// Construct the single roster source this configuration names.
    pub fn build_source(&self) -> Result<Arc<dyn RosterSource>> {
        let location = self.source_location.trim();
        if location.is_empty() {
            anyhow::bail!("No roster source location configured");
        }

        let source: Arc<dyn RosterSource> = match self.source_kind {
            SourceKind::Remote => Arc::new(
                RemoteJsonSource::new(location, self.fields(), self.request_timeout())
                    .context("Failed to create HTTP client")?,
            ),
            SourceKind::SpreadsheetFile => {
                Arc::new(SpreadsheetFileSource::new(location, self.fields()))
            }
            SourceKind::JsonFile => Arc::new(LocalJsonSource::new(location, self.fields())),
        };
        Ok(source)
    }

    /// Source, cache and lookup service wired together.
    pub fn build_service(&self) -> Result<LookupService> {
        let cache = RosterCache::new(self.build_source()?, self.ttl());
        Ok(LookupService::new(Arc::new(cache)))
    }
}
