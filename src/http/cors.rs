//! CORS preflight synthesis and response annotations.
//!
//! Preflights are answered locally and never reach the upstream. The
//! allowed origin mirrors whatever the browser sends; this trusts all
//! origins and is a deliberate policy for local single-hop deployments,
//! not something to carry into a shared environment.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

/// Methods advertised on every preflight answer.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Answer an `OPTIONS` preflight from the inbound request headers alone.
///
/// Status is always `204`; the origin and requested headers are mirrored
/// back, falling back to `*` when absent.
pub fn preflight(request_headers: &HeaderMap) -> Response {
    let origin = request_headers
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or(HeaderValue::from_static("*"));
    let allow_headers = request_headers
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or(HeaderValue::from_static("*"));

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    response
}

/// Annotate a successful relay response so the SPA can call the API from
/// a different serving origin. `Vary: Origin` keeps shared caches from
/// mixing origins.
pub fn annotate(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    let origin = origin.cloned().unwrap_or(HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}
