// src/main.rs

use adamik_mcp_server::{api::create_router, config::Config, mcp::handler::serve_lines, McpServer};
use std::env;
use std::net::SocketAddr;
use std::process;
use tokio::io;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `RUST_LOG` is unset. Covers this binary, the library and tower-http.
const DEFAULT_LOG_FILTER: &str = "adamik_mcp=info,adamik_mcp_server=info,tower_http=info";

// --- HTTP Server Logic ---
async fn run_http_server(server: McpServer) -> anyhow::Result<()> {
    let port = server.state.config.port;
    let app = create_router(server);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// --- MCP Server Logic ---
async fn run_mcp_server(server: McpServer) {
    info!("🚀 Starting MCP server on stdin/stdout...");

    let stdin = io::BufReader::new(io::stdin());
    if let Err(e) = serve_lines(stdin, io::stdout(), &server).await {
        error!("stdio transport failed: {}", e);
    }

    info!("MCP server shutting down");
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout belongs to the transport
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            eprintln!("Configuration error: {:#}", e);
            process::exit(1);
        }
    };
    info!(
        "Configured for {} with {} supported chains",
        config.api_base_url,
        config.supported_chains().len()
    );

    let server = match McpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("❌ Failed to initialize server: {:#}", e);
            eprintln!("Startup error: {:#}", e);
            process::exit(1);
        }
    };
    info!("Registered {} tools", server.registry.len());

    // stdio is the default transport; HTTP is opt-in
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--http".to_string()) || env::var("HTTP_MODE").is_ok() {
        if let Err(e) = run_http_server(server).await {
            error!("❌ HTTP server failed: {:#}", e);
            process::exit(1);
        }
    } else {
        run_mcp_server(server).await;
    }
}
