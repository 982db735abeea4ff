//! Relay failure taxonomy.

use std::time::Duration;
use thiserror::Error;

/// Transport-level failures while talking to the upstream.
///
/// Every variant names the attempted upstream URL so the 502 body can
/// tell the operator exactly which call failed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("connect to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl RelayError {
    /// Classify a send failure, separating timeouts from other
    /// transport errors.
    pub fn from_send(url: &str, timeout: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            }
        } else {
            Self::Connect {
                url: url.to_string(),
                source,
            }
        }
    }

    /// The upstream URL the failed attempt targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::Connect { url, .. } | Self::Timeout { url, .. } | Self::Body { url, .. } => url,
        }
    }
}
