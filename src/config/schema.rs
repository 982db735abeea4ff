//! Configuration schema definitions.
//!
//! All values are established once at startup and shared read-only with
//! the request handlers; nothing here is mutated afterwards.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Root configuration for the edge relay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProxyConfig {
    /// Local listener settings.
    pub server: ServerConfig,

    /// The single upstream service relayed requests are sent to.
    pub upstream: UpstreamTarget,

    /// Timeouts applied to relayed calls.
    pub timeouts: TimeoutPolicy,

    /// Static asset serving settings.
    pub assets: AssetConfig,
}

/// Local listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    /// Interface to bind (e.g. "0.0.0.0").
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl ServerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
        }
    }
}

/// URL scheme of the upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Default for Scheme {
    fn default() -> Self {
        Self::Http
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// The upstream service every relayed call targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamTarget {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl UpstreamTarget {
    /// Base URL prepended to every relayed path.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl Default for UpstreamTarget {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Timeouts for relayed calls, in seconds.
///
/// The speak timeout applies only to paths ending in the long-running
/// operation suffix; everything else uses the relay timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutPolicy {
    pub relay_secs: u64,
    pub speak_secs: u64,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            relay_secs: 60,
            speak_secs: 600,
        }
    }
}

/// Static asset serving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetConfig {
    /// Directory the SPA assets are served from.
    pub root: PathBuf,

    /// Entry document served for every unmatched path.
    pub index: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
        }
    }
}
