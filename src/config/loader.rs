//! Configuration loading from disk and environment.
//!
//! The config file is a flat list of `KEY=VALUE` lines (`#` starts a
//! comment). Loading never fails: an unreadable file or an unparseable
//! value leaves the affected keys at their defaults and logs a warning,
//! because a broken config must not take the relay down.

use std::fs;
use std::path::Path;

use crate::config::schema::{ProxyConfig, Scheme};

/// Keys recognized in the config file and the environment.
pub const CONFIG_KEYS: [&str; 7] = [
    "UPSTREAM_SCHEME",
    "UPSTREAM_HOST",
    "UPSTREAM_PORT",
    "SERVER_HOST",
    "SERVER_PORT",
    "RELAY_TIMEOUT",
    "SPEAK_TIMEOUT",
];

/// Load configuration from the given file, then apply environment
/// overrides. Always returns a usable config.
pub fn load_config(path: &Path) -> ProxyConfig {
    let mut config = ProxyConfig::default();

    match fs::read_to_string(path) {
        Ok(content) => apply_lines(&mut config, &content),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "config file not readable; using defaults"
            );
        }
    }

    apply_env(&mut config);
    config
}

/// Apply `KEY=VALUE` lines to the config, skipping comments and blanks.
fn apply_lines(config: &mut ProxyConfig, content: &str) {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => apply_key(config, key.trim(), value.trim()),
            None => tracing::warn!(line, "ignoring config line without '='"),
        }
    }
}

/// Environment variables override file values.
fn apply_env(config: &mut ProxyConfig) {
    for key in CONFIG_KEYS {
        if let Ok(value) = std::env::var(key) {
            apply_key(config, key, &value);
        }
    }
}

fn apply_key(config: &mut ProxyConfig, key: &str, value: &str) {
    match key {
        "UPSTREAM_SCHEME" => match value {
            "http" => config.upstream.scheme = Scheme::Http,
            "https" => config.upstream.scheme = Scheme::Https,
            other => tracing::warn!(value = other, "unknown UPSTREAM_SCHEME; keeping default"),
        },
        "UPSTREAM_HOST" => config.upstream.host = value.to_string(),
        "UPSTREAM_PORT" => set_port(&mut config.upstream.port, key, value),
        "SERVER_HOST" => config.server.host = value.to_string(),
        "SERVER_PORT" => set_port(&mut config.server.port, key, value),
        "RELAY_TIMEOUT" => set_secs(&mut config.timeouts.relay_secs, key, value),
        "SPEAK_TIMEOUT" => set_secs(&mut config.timeouts.speak_secs, key, value),
        other => tracing::debug!(key = other, "ignoring unknown config key"),
    }
}

fn set_port(slot: &mut u16, key: &str, value: &str) {
    match value.parse() {
        Ok(port) => *slot = port,
        Err(error) => tracing::warn!(key, value, error = %error, "invalid port; keeping default"),
    }
}

fn set_secs(slot: &mut u64, key: &str, value: &str) {
    match value.parse() {
        Ok(secs) => *slot = secs,
        Err(error) => tracing::warn!(key, value, error = %error, "invalid timeout; keeping default"),
    }
}
