use anyhow::Context as _;
use axum::{Router, routing::get};
use clap::Parser as _;
use freelancer_mcp::FreelancerMcpServer;
use freelancer_mcp::config::{Cli, LogFormat, Settings, Transport};
use freelancer_mcp::session::FreelancerSession;
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let settings = Arc::new(Settings::from(&cli));
    tracing::info!(
        server = %settings.server_name,
        version = %settings.server_version,
        api_url = %settings.api_url,
        transport = ?cli.transport,
        "starting Freelancer MCP server"
    );

    if !settings.has_token() {
        tracing::error!("missing required environment variable: FLN_OAUTH_TOKEN");
        anyhow::bail!("FLN_OAUTH_TOKEN (or --oauth-token) must be set to a Freelancer OAuth token");
    }

    tracing::info!("available tools: search_projects, search_freelancers, health_check");
    tracing::info!(
        "available resources: freelancer://config, freelancer://help, freelancer://examples"
    );

    let server = FreelancerMcpServer::new(Arc::new(FreelancerSession::new(settings)));

    match cli.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, cli.bind).await,
    }
}

/// Logs always go to stderr: with the stdio transport stdout carries the MCP stream.
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn serve_stdio(server: FreelancerMcpServer) -> anyhow::Result<()> {
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .context("initialize MCP session over stdio")?;

    tokio::select! {
        reason = running.waiting() => {
            let reason = reason.context("MCP stdio service task failed")?;
            tracing::info!(?reason, "MCP client disconnected");
        }
        () = shutdown_signal() => {}
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn serve_http(server: FreelancerMcpServer, bind: SocketAddr) -> anyhow::Result<()> {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", mcp);

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    tracing::info!(address = %bind, "listening (streamable HTTP at /mcp)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
