//! The relay engine: per-request upstream call reconstruction.
//!
//! # Responsibilities
//! - Build the upstream URL from the immutable target
//! - Forward inbound headers minus the inbound exclude set
//! - Select the timeout from the path (long-running suffix)
//! - Encode the body: JSON re-serialized, everything else verbatim
//! - Reconstruct the response minus the outbound exclude set
//! - Synthesize a 502 with a descriptive body on transport failure

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::time::Duration;

use crate::config::{TimeoutPolicy, UpstreamTarget};
use crate::http::cors;
use crate::http::headers::{filter_headers, INBOUND_EXCLUDED, OUTBOUND_EXCLUDED};
use crate::relay::error::RelayError;

/// Paths ending in this suffix are long-running speech synthesis calls
/// and get the extended timeout.
pub const SPEAK_SUFFIX: &str = "/speak";

/// One inbound call, captured before forwarding. Discarded after the
/// response is sent; nothing survives across requests.
#[derive(Debug)]
pub struct RelayRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Raw query string as received, if any.
    pub query: Option<String>,
    pub body: Bytes,
}

/// The response handed back to the browser.
#[derive(Debug)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RelayResponse {
    /// The single failure shape: 502 with a body naming the upstream URL
    /// and the underlying error, and no upstream headers.
    fn bad_gateway(error: &RelayError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            headers: HeaderMap::new(),
            body: Bytes::from(format!("Proxy error: {error}")),
        }
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Stateless per-call translator between the browser and the upstream.
///
/// Holds only the immutable target, the timeout policy, and the shared
/// HTTP client; connection reuse is whatever the client provides.
pub struct RelayEngine {
    target: UpstreamTarget,
    timeouts: TimeoutPolicy,
    client: reqwest::Client,
}

impl RelayEngine {
    pub fn new(target: UpstreamTarget, timeouts: TimeoutPolicy) -> Self {
        Self {
            target,
            timeouts,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL every relayed call is built on.
    pub fn base_url(&self) -> String {
        self.target.base_url()
    }

    /// Relay one inbound request to `upstream_path` and translate the
    /// reply. Transport failures come back as a synthesized 502; this
    /// never returns an `Err` and never retries.
    pub async fn relay(&self, inbound: RelayRequest, upstream_path: &str) -> RelayResponse {
        let url = format!("{}{}", self.target.base_url(), upstream_path);
        tracing::info!(
            method = %inbound.method,
            path = upstream_path,
            url = %url,
            "relaying request"
        );

        match self.forward(inbound, upstream_path, &url).await {
            Ok(response) => {
                tracing::info!(url = %url, status = %response.status, "upstream replied");
                response
            }
            Err(error) => {
                tracing::error!(url = %url, error = %error, "relay failed");
                RelayResponse::bad_gateway(&error)
            }
        }
    }

    async fn forward(
        &self,
        inbound: RelayRequest,
        upstream_path: &str,
        url: &str,
    ) -> Result<RelayResponse, RelayError> {
        let timeout = select_timeout(&self.timeouts, upstream_path);
        let origin = inbound.headers.get(header::ORIGIN).cloned();

        let mut headers = filter_headers(&inbound.headers, &INBOUND_EXCLUDED);
        let (body, query) = encode_body(&mut headers, inbound.body, inbound.query);

        let mut target = url.to_string();
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(&query);
        }

        let response = self
            .client
            .request(inbound.method, &target)
            .headers(headers)
            .body(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| RelayError::from_send(url, timeout, source))?;

        let status = response.status();
        let mut headers = filter_headers(response.headers(), &OUTBOUND_EXCLUDED);
        let body = response.bytes().await.map_err(|source| RelayError::Body {
            url: url.to_string(),
            source,
        })?;

        cors::annotate(&mut headers, origin.as_ref());
        Ok(RelayResponse {
            status,
            headers,
            body,
        })
    }
}

/// Pick the timeout for a relayed path.
pub fn select_timeout(policy: &TimeoutPolicy, upstream_path: &str) -> Duration {
    if upstream_path.ends_with(SPEAK_SUFFIX) {
        Duration::from_secs(policy.speak_secs)
    } else {
        Duration::from_secs(policy.relay_secs)
    }
}

/// Decide how the body travels upstream.
///
/// JSON payloads are re-serialized so the forwarded `Content-Length`
/// matches what is actually sent, and the client's query string is
/// dropped; a payload that fails to parse degrades to an empty body.
/// Anything else passes through byte-for-byte with the original query.
fn encode_body(
    headers: &mut HeaderMap,
    body: Bytes,
    query: Option<String>,
) -> (Bytes, Option<String>) {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if !is_json {
        return (body, query);
    }

    let encoded = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => serde_json::to_vec(&value).unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(encoded.len()));
    (Bytes::from(encoded), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn speak_paths_get_extended_timeout() {
        let policy = TimeoutPolicy {
            relay_secs: 60,
            speak_secs: 600,
        };
        assert_eq!(select_timeout(&policy, "/aim/speak"), Duration::from_secs(600));
        assert_eq!(select_timeout(&policy, "/speak"), Duration::from_secs(600));
        assert_eq!(select_timeout(&policy, "/info"), Duration::from_secs(60));
        assert_eq!(select_timeout(&policy, "/aim/speaker"), Duration::from_secs(60));
    }

    #[test]
    fn json_body_is_reencoded_and_query_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/json; charset=utf-8".parse().unwrap(),
        );
        headers.insert(header::CONTENT_LENGTH, "999".parse().unwrap());

        let raw = Bytes::from_static(b"{ \"a\" : 1 ,\n \"b\": [1, 2] }");
        let (body, query) = encode_body(&mut headers, raw, Some("x=1".to_string()));

        assert!(query.is_none());
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"a": 1, "b": [1, 2]}));
        let length: usize = headers
            .get(header::CONTENT_LENGTH)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(length, body.len());
    }

    #[test]
    fn malformed_json_degrades_to_empty_body() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let (body, query) = encode_body(
            &mut headers,
            Bytes::from_static(b"{not json"),
            Some("q=1".to_string()),
        );
        assert!(body.is_empty());
        assert!(query.is_none());
        assert_eq!(headers.get(header::CONTENT_LENGTH).unwrap(), "0");
    }

    #[test]
    fn opaque_bodies_pass_through_untouched() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/octet-stream".parse().unwrap());

        let raw = Bytes::from_static(&[0x00, 0xff, 0x42, 0x7f]);
        let (body, query) = encode_body(&mut headers, raw.clone(), Some("foo=bar".to_string()));
        assert_eq!(body, raw);
        assert_eq!(query.as_deref(), Some("foo=bar"));
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let mut headers = HeaderMap::new();
        let raw = Bytes::from_static(b"{\"looks\": \"like json\"}");
        let (body, _) = encode_body(&mut headers, raw.clone(), None);
        assert_eq!(body, raw);
    }

    #[test]
    fn bad_gateway_body_names_the_url() {
        let error = RelayError::Timeout {
            url: "http://127.0.0.1:8000/info".to_string(),
            seconds: 60,
        };
        let response = RelayResponse::bad_gateway(&error);
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert!(response.headers.is_empty());
        let body = String::from_utf8(response.body.to_vec()).unwrap();
        assert!(body.contains("http://127.0.0.1:8000/info"));
    }
}
