//! Upstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! RelayRequest (method, headers, query, body)
//!     → engine.rs (filter headers, pick timeout, encode body)
//!     → upstream HTTP call (bounded by the selected timeout)
//!     → RelayResponse (filtered headers + CORS annotations)
//!        or synthesized 502 on transport failure
//! ```
//!
//! # Design Decisions
//! - Purely per-call: the engine keeps no request or response state
//! - Failure is a first-class branch (`RelayError`), not a caught panic
//! - No retries: transport failures surface immediately as 502

pub mod engine;
pub mod error;

pub use engine::{RelayEngine, RelayRequest, RelayResponse, SPEAK_SUFFIX};
pub use error::RelayError;
