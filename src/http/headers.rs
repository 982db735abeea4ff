//! Directional header filtering.
//!
//! The exclude sets are fixed. Inbound, only `Host` is dropped so the
//! upstream client can set its own authority. Outbound, the framing
//! headers (`Content-Length`, `Transfer-Encoding`, `Connection`) are
//! dropped because the local transport must recompute them; copying them
//! from the upstream desyncs the client connection.

use axum::http::{header, HeaderMap, HeaderName};

/// Headers never forwarded from the client to the upstream.
pub static INBOUND_EXCLUDED: [HeaderName; 1] = [header::HOST];

/// Headers never copied from the upstream response to the client.
pub static OUTBOUND_EXCLUDED: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Copy all headers except the excluded names, preserving order and
/// repeated values.
pub fn filter_headers(source: &HeaderMap, excluded: &[HeaderName]) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if excluded.contains(name) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}
