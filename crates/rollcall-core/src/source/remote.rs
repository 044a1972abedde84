//! Roster served as a JSON document over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::models::Roster;

use super::json::parse_roster;
use super::{LoadError, RosterFields, RosterSource};

/// HTTP request timeout in seconds.
/// A timed-out fetch surfaces as `LoadError::SourceUnavailable`.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Roster fetched with a GET request, e.g. a raw gist URL.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct RemoteJsonSource {
    client: Client,
    url: String,
    fields: RosterFields,
    initial_backoff: Duration,
}

impl RemoteJsonSource {
    pub fn new(url: impl Into<String>, fields: RosterFields, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            fields,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Override the first rate-limit backoff delay; later delays double.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for any other status.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, LoadError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(LoadError::from_status(status, &body))
        }
    }

    async fn fetch_text(&self) -> Result<String, LoadError> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let response = self
                .client
                .get(&self.url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response.text().await?),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(LoadError::SourceUnavailable(format!(
                            "rate limited by {} after {} retries",
                            self.url, MAX_RATE_LIMIT_RETRIES
                        )));
                    }
                    warn!(url = %self.url, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl RosterSource for RemoteJsonSource {
    async fn load(&self) -> Result<Roster, LoadError> {
        debug!(url = %self.url, "Fetching roster document");
        let text = self.fetch_text().await?;
        parse_roster(&text, &self.fields)
    }

    fn describe(&self) -> String {
        format!("remote document {}", self.url)
    }
}
