use thiserror::Error;

/// Failure to produce a roster from its source.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The source could not be reached or read (network, file, timeout, HTTP status).
    #[error("Roster source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source was read but is not shaped like a roster.
    #[error("Roster could not be parsed: {0}")]
    Parse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl LoadError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        LoadError::SourceUnavailable(format!("Status {}: {}", status, Self::truncate_body(body)))
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, LoadError::SourceUnavailable(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LoadError::Parse(err.to_string())
        } else if err.is_timeout() {
            LoadError::SourceUnavailable(format!("request timed out: {}", err))
        } else {
            LoadError::SourceUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::SourceUnavailable(err.to_string())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => LoadError::SourceUnavailable(e.to_string()),
            other => LoadError::Parse(other.to_string()),
        }
    }
}
