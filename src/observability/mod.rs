//! Cross-cutting observability.

pub mod logging;
