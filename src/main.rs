//! SPA Edge Relay
//!
//! Sits between a browser SPA and one backend API service: serves the
//! SPA's static assets with fallback routing, and relays a fixed set of
//! API paths to the upstream while bridging CORS, timeouts, header
//! sanitization, and body encoding.
//!
//! ```text
//!   browser ──▶ edge-relay ──▶ upstream API
//!      ▲            │
//!      └── assets ──┘  (SPA fallback routing)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use edge_relay::config;
use edge_relay::http::HttpServer;
use edge_relay::observability;

#[derive(Parser, Debug)]
#[command(name = "edge-relay", version, about = "Local SPA edge relay")]
struct Args {
    /// Path to the KEY=VALUE configuration file.
    #[arg(long, default_value = "upstream.conf")]
    config: PathBuf,

    /// Directory the SPA assets are served from (overrides the default).
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init("edge_relay=info,tower_http=info");

    let args = Args::parse();
    let mut config = config::load_config(&args.config);
    if let Some(root) = args.root {
        config.assets.root = root;
    }

    tracing::info!(
        bind_address = %config.server.bind_address(),
        upstream = %config.upstream.base_url(),
        assets_root = %config.assets.root.display(),
        "configuration resolved"
    );

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
