//! Structured logging.
//!
//! One tracing subscriber for the whole process, filterable through
//! `RUST_LOG`. Log emission never blocks or fails a request.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. `default_filter` applies when
/// `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
