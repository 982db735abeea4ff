//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! upstream.conf (KEY=VALUE lines)
//!     → loader.rs (parse, apply known keys)
//!     → environment variables (override file values)
//!     → ProxyConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - Loading never fails: missing or malformed sources degrade to
//!   per-key defaults with a warning
//! - All sections have defaults so a bare deployment works

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{AssetConfig, ProxyConfig, Scheme, ServerConfig, TimeoutPolicy, UpstreamTarget};
