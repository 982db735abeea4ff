//! Static asset serving with SPA fallback.
//!
//! Every path that does not name a regular file under the served root
//! resolves to the entry document, so client-side routing can handle
//! deep links. Composes with the relay only by sharing the listener.

pub mod mime;
pub mod resolver;

pub use resolver::{Asset, StaticRouter};
