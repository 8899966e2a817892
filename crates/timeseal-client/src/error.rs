//! Error types for remote operations.
//!
//! Batched operations never raise these for per-item failures; each failure
//! is captured into the operation's outcome alongside the originating
//! calendar URL or verifier name.

use thiserror::Error;

use timeseal_core::{CodecError, OverflowError};

/// A failed exchange with a calendar server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("calendar {url} returned an undecodable tree: {source}")]
    BadResponse {
        url: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Overflow(#[from] OverflowError),
}

impl ClientError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Transport {
                url: url.into(),
                message: err.to_string(),
            }
        }
    }
}

/// A failed blockchain lookup.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Network(#[from] ClientError),

    #[error("verifier call timed out")]
    Timeout,

    #[error("no block found at height {0}")]
    MissingBlock(u64),

    #[error("merkle root mismatch at height {height}: proof says {expected}, block has {actual}")]
    RootMismatch {
        height: u64,
        expected: String,
        actual: String,
    },
}

/// A per-calendar failure recorded in a batch outcome.
#[derive(Debug)]
pub struct CalendarFailure {
    /// The calendar the failure originated from.
    pub url: String,
    pub error: ClientError,
}
