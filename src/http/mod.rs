//! HTTP surface of the relay.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum router: classify API route vs asset route)
//!     → cors.rs (OPTIONS answered locally, no upstream I/O)
//!     → relay engine (API routes)  |  assets resolver (everything else)
//!     → response back to the browser
//! ```

pub mod cors;
pub mod headers;
pub mod server;

pub use server::HttpServer;
