//! SPA Edge Relay Library
//!
//! A local edge process that serves a single-page application's static
//! assets and relays a fixed set of API paths to one upstream service.

pub mod assets;
pub mod config;
pub mod http;
pub mod observability;
pub mod relay;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use relay::RelayEngine;
