//! Calendar transport: submitting digests and fetching upgrades.
//!
//! The [`Calendar`] trait abstracts the remote protocol so the transforms
//! can be driven by HTTP in production and by an in-memory implementation
//! in tests. Implementations return raw response bodies; the transforms
//! parse them as bare trees.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::error::ClientError;

/// Result type for calendar operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Calendars every submission fans out to unless overridden.
pub const DEFAULT_CALENDARS: &[&str] = &[
    "https://a.pool.opentimestamps.org",
    "https://b.pool.opentimestamps.org",
    "https://a.pool.eternitywall.com",
    "https://ots.btc.catallaxy.com",
];

/// Default per-request deadline for calendar calls.
pub const DEFAULT_CALENDAR_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for remote submission and upgrades.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Calendar base URLs to fan out to.
    pub calendars: Vec<String>,
    /// Per-request deadline.
    pub timeout: Duration,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendars: DEFAULT_CALENDARS.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_CALENDAR_TIMEOUT,
        }
    }
}

/// Transport trait for calendar servers.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Calendar: Send + Sync {
    /// POST a digest to `{base_url}/digest`; the body is the raw digest
    /// bytes. Returns the raw bare-tree response body.
    async fn submit_digest(&self, base_url: &str, digest: &[u8]) -> Result<Bytes>;

    /// GET `{base_url}/timestamp/{hex(commitment)}`. Returns the raw
    /// bare-tree response body.
    async fn fetch_timestamp(&self, base_url: &str, commitment: &[u8]) -> Result<Bytes>;
}

/// Calendar implementation speaking the public HTTP protocol.
pub struct HttpCalendar {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCalendar {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Build a client honouring the config's per-request deadline.
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(config.timeout)
    }

    async fn read_body(url: String, response: reqwest::Response) -> Result<Bytes> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                url,
                status: status.as_u16(),
                body,
            });
        }
        response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))
    }
}

impl Default for HttpCalendar {
    fn default() -> Self {
        Self::new(DEFAULT_CALENDAR_TIMEOUT)
    }
}

#[async_trait]
impl Calendar for HttpCalendar {
    async fn submit_digest(&self, base_url: &str, digest: &[u8]) -> Result<Bytes> {
        let url = format!("{}/digest", base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(digest.to_vec())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;
        Self::read_body(url, response).await
    }

    async fn fetch_timestamp(&self, base_url: &str, commitment: &[u8]) -> Result<Bytes> {
        let url = format!(
            "{}/timestamp/{}",
            base_url.trim_end_matches('/'),
            hex::encode(commitment)
        );
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, e))?;
        Self::read_body(url, response).await
    }
}

/// A staged in-memory calendar for deterministic tests.
pub mod memory {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// In-memory [`Calendar`] with staged responses and failures.
    #[derive(Default)]
    pub struct MemoryCalendar {
        inner: Mutex<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        submit_responses: HashMap<String, Bytes>,
        upgrade_responses: HashMap<(String, String), Bytes>,
        failing: HashSet<String>,
        submissions: Vec<(String, Vec<u8>)>,
    }

    impl MemoryCalendar {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stage the body returned for any digest submitted to `base_url`.
        pub fn stage_submit(&self, base_url: &str, body: impl Into<Bytes>) {
            self.inner
                .lock()
                .unwrap()
                .submit_responses
                .insert(base_url.to_string(), body.into());
        }

        /// Stage the body returned for an upgrade of `commitment` at
        /// `base_url`.
        pub fn stage_upgrade(&self, base_url: &str, commitment: &[u8], body: impl Into<Bytes>) {
            self.inner
                .lock()
                .unwrap()
                .upgrade_responses
                .insert((base_url.to_string(), hex::encode(commitment)), body.into());
        }

        /// Make every request to `base_url` answer 500.
        pub fn fail(&self, base_url: &str) {
            self.inner.lock().unwrap().failing.insert(base_url.to_string());
        }

        /// Digests submitted so far, in arrival order.
        pub fn submissions(&self) -> Vec<(String, Vec<u8>)> {
            self.inner.lock().unwrap().submissions.clone()
        }
    }

    #[async_trait]
    impl Calendar for MemoryCalendar {
        async fn submit_digest(&self, base_url: &str, digest: &[u8]) -> Result<Bytes> {
            let mut inner = self.inner.lock().unwrap();
            inner
                .submissions
                .push((base_url.to_string(), digest.to_vec()));
            if inner.failing.contains(base_url) {
                return Err(ClientError::Http {
                    url: format!("{base_url}/digest"),
                    status: 500,
                    body: "staged failure".into(),
                });
            }
            inner
                .submit_responses
                .get(base_url)
                .cloned()
                .ok_or_else(|| ClientError::Http {
                    url: format!("{base_url}/digest"),
                    status: 404,
                    body: "no staged response".into(),
                })
        }

        async fn fetch_timestamp(&self, base_url: &str, commitment: &[u8]) -> Result<Bytes> {
            let inner = self.inner.lock().unwrap();
            if inner.failing.contains(base_url) {
                return Err(ClientError::Http {
                    url: format!("{base_url}/timestamp/{}", hex::encode(commitment)),
                    status: 500,
                    body: "staged failure".into(),
                });
            }
            inner
                .upgrade_responses
                .get(&(base_url.to_string(), hex::encode(commitment)))
                .cloned()
                .ok_or_else(|| ClientError::Http {
                    url: format!("{base_url}/timestamp/{}", hex::encode(commitment)),
                    status: 404,
                    body: "not found".into(),
                })
        }
    }
}
