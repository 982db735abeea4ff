//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the Axum router: relay routes, debug/config routes, asset fallback
//! - Classify each request: API route vs asset route (the two never interact)
//! - Answer `OPTIONS` locally via the CORS synthesizer
//! - Hand API requests to the relay engine with a correlation ID
//! - Serve with graceful shutdown on ctrl-c

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::assets::StaticRouter;
use crate::config::ProxyConfig;
use crate::http::cors;
use crate::relay::{RelayEngine, RelayRequest};

/// Application state injected into handlers. Everything in here is
/// read-only after startup; handlers share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RelayEngine>,
    pub assets: Arc<StaticRouter>,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the edge relay.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new server from the resolved configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let engine = Arc::new(RelayEngine::new(
            config.upstream.clone(),
            config.timeouts,
        ));
        let assets = Arc::new(StaticRouter::new(&config.assets));
        let state = AppState {
            engine,
            assets,
            config: Arc::new(config.clone()),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router. API paths are fixed; everything else is
    /// the static fallback.
    fn build_router(state: AppState) -> Router {
        let relay = get(relay_handler)
            .post(relay_handler)
            .options(preflight_handler);

        Router::new()
            .route("/info", relay.clone())
            .route("/balance", relay.clone())
            .route("/exchange_rates", relay.clone())
            .route("/nonce", relay.clone())
            .route("/aim/{*subpath}", relay)
            .route("/debug", post(debug_handler).options(preflight_handler))
            .route("/__upstream", get(upstream_info_handler))
            .fallback(asset_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the given listener until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url(),
            "edge relay listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("edge relay stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Relay an API request to the identical upstream path.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let (parts, body) = request.into_parts();

    // Forwarding beats strict validation: an unreadable body is relayed
    // as empty rather than rejected.
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(request_id = %request_id, error = %error, "request body unreadable; relaying empty body");
            Bytes::new()
        }
    };

    let inbound = RelayRequest {
        method: parts.method,
        headers: parts.headers,
        query,
        body,
    };

    let span = tracing::info_span!("relay", request_id = %request_id);
    state
        .engine
        .relay(inbound, &path)
        .instrument(span)
        .await
        .into_response()
}

/// Answer a CORS preflight without touching the upstream.
async fn preflight_handler(headers: HeaderMap) -> Response {
    cors::preflight(&headers)
}

/// Fixed acknowledgement the SPA uses to probe the relay itself.
async fn debug_handler() -> Json<Value> {
    Json(json!({"ok": true}))
}

/// Resolved configuration as a status document for the frontend.
async fn upstream_info_handler(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "server": &config.server,
        "upstream": {
            "scheme": config.upstream.scheme,
            "host": &config.upstream.host,
            "port": config.upstream.port,
            "base": config.upstream.base_url(),
        },
        "timeouts": {
            "relay": config.timeouts.relay_secs,
            "speak": config.timeouts.speak_secs,
        },
    }))
}

/// Serve a static asset, falling back to the SPA entry document.
async fn asset_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if request.method() != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response();
    }
    match state.assets.resolve(request.uri().path()).await {
        Some(asset) => (
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.bytes,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl+C handler");
    } else {
        tracing::info!("shutdown signal received");
    }
}
