//! Hack or Snooze - news aggregator API server

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LogFormat, LoggingConfig};
use snooze_api::{AppState, create_router, validate_username};
use snooze_db::{Database, NewUser};

/// Hack or Snooze - stories, users and favorites over a JSON API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "SNOOZE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "SNOOZE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging);

    info!("Starting Hack or Snooze v{}", env!("CARGO_PKG_VERSION"));

    // Create data directory
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let db = Database::new(&config.database.url())
        .await
        .context("Failed to open database")?;

    if let Some((username, password)) = config.auth.staff_account() {
        ensure_staff_user(&db, username, password).await?;
    }

    if !db.has_users().await? {
        info!("No users yet; accounts are created through POST /api/users/signup");
    }

    let metrics_handle = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(Arc::new(handle))
    } else {
        None
    };

    let state = AppState::new(db);

    let app = create_router(state, metrics_handle)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind_addr, port))?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured staff account unless the username is taken
async fn ensure_staff_user(db: &Database, username: &str, password: &str) -> Result<()> {
    validate_username(username)
        .with_context(|| format!("Invalid staff username: {}", username))?;

    if let Some(existing) = db.get_user_by_username(username).await? {
        if existing.is_staff {
            info!("Staff user {} already exists", username);
        } else {
            warn!(
                "User {} already exists but is not staff; leaving the account unchanged",
                username
            );
        }
        return Ok(());
    }

    let password_hash = snooze_auth::hash_password(password)?;
    db.insert_user(NewUser {
        username: username.to_string(),
        password_hash,
        first_name: "Staff".to_string(),
        last_name: "User".to_string(),
        is_staff: true,
    })
    .await?;

    info!("Staff user {} created", username);
    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            warn!("Server will run until the process is killed");
            std::future::pending::<()>().await;
        }
    }
}
