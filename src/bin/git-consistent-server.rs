// ABOUTME: Server binary for the git-consistent habit tracking API
// ABOUTME: Loads configuration, connects the database, wires providers and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # git-consistent Server Binary
//!
//! Starts the HTTP API with Firebase ID token verification, `SQLite`
//! persistence and the configured LLM provider.

#[cfg(not(unix))]
use std::future::pending;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use git_consistent_server::auth::FirebaseAuth;
use git_consistent_server::config::ServerConfig;
use git_consistent_server::database::Database;
use git_consistent_server::flows::{FlowRunner, FlowSettings};
use git_consistent_server::llm::ChatProvider;
use git_consistent_server::logging;
use git_consistent_server::resources::ServerResources;
use git_consistent_server::routes::build_router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "git-consistent-server")]
#[command(about = "git-consistent - habit tracking API with contribution graphs and LLM coaching")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside local development
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let args = Args::parse();

    logging::init_from_env()?;
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    config.summary_log();

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized");

    let firebase = FirebaseAuth::new(config.firebase.clone());
    if !firebase.is_enabled() {
        warn!("Firebase authentication is not configured; protected routes will reject requests");
    }

    let provider = ChatProvider::from_config(&config.llm)?;
    info!(
        provider = provider.name(),
        model = %config.llm.effective_model(),
        "LLM provider initialized"
    );
    let flows = FlowRunner::new(provider, FlowSettings::from(&config.llm));

    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.http_port))?;

    let resources = Arc::new(ServerResources::new(
        config,
        database,
        Arc::new(firebase),
        flows,
    ));
    let app = build_router(Arc::clone(&resources));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening");
    display_available_endpoints(&addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Display all available API endpoints
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(addr: &SocketAddr) {
    info!("=== Available API Endpoints ===");
    info!("Health:");
    info!("   Liveness:          GET    http://{addr}/health");
    info!("   Readiness:         GET    http://{addr}/ready");
    info!("Session:");
    info!("   Establish Session: POST   http://{addr}/api/auth/session");
    info!("   Profile:           GET    http://{addr}/api/me");
    info!("Habits:");
    info!("   List / Create:     GET|POST http://{addr}/api/habits");
    info!("   Get/Update/Delete: GET|PUT|DELETE http://{addr}/api/habits/{{id}}");
    info!("   Archive:           POST   http://{addr}/api/habits/{{id}}/archive");
    info!("   Unarchive:         POST   http://{addr}/api/habits/{{id}}/unarchive");
    info!("   Toggle Completion: PUT    http://{addr}/api/habits/{{id}}/logs/{{date}}");
    info!("   Logs in Range:     GET    http://{addr}/api/logs?from=&to=");
    info!("Views:");
    info!("   Dashboard:         GET    http://{addr}/api/dashboard");
    info!("   Sidebar:           GET    http://{addr}/api/sidebar");
    info!("   Contributions:     GET    http://{addr}/api/contributions");
    info!("AI Coaching:");
    info!("   Coach Tips:        POST   http://{addr}/api/coach/tips");
    info!("   Habit Review:      POST   http://{addr}/api/insights/review");
    info!("   Journal:           GET|POST http://{addr}/api/journal");
    info!("Settings:");
    info!("   Settings:          GET    http://{addr}/api/settings");
    info!("   Nudges:            PUT    http://{addr}/api/settings/nudges");
    info!("=== End of Endpoint List ===");
}
