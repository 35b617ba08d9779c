//! introquiz-server - intro quiz web service
//!
//! Opens (or creates) the catalog database in the root folder and serves
//! the quiz pages and JSON endpoints until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use introquiz_common::config::{audio_dir, database_path, resolve_root_folder, ROOT_FOLDER_ENV};
use introquiz_common::db::{init_database, songs::count_songs};
use introquiz_server::api::buildinfo::BuildInfo;
use introquiz_server::session::SessionStore;
use introquiz_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for introquiz-server
#[derive(Parser, Debug)]
#[command(name = "introquiz-server")]
#[command(about = "Intro quiz web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "INTROQUIZ_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "INTROQUIZ_BIND")]
    bind: String,

    /// Folder holding introquiz.db and the audio directory
    #[arg(short, long, env = "INTROQUIZ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Minutes a quiz session may sit idle before its scores are dropped
    #[arg(long, default_value = "120", env = "INTROQUIZ_SESSION_TTL_MINS")]
    session_ttl_mins: u64,

    /// Maximum number of sessions kept in memory
    #[arg(long, default_value = "10000", env = "INTROQUIZ_MAX_SESSIONS")]
    max_sessions: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "introquiz_server=info,introquiz_common=info,tower_http=info".into()),
        )
        .init();

    // Build identification first, before any database delay
    info!("Starting introquiz-server {}", BuildInfo::current());

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV);
    info!("Root folder: {}", root_folder.display());

    let db_path = database_path(&root_folder);
    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database {}: {}", db_path.display(), e);
            return Err(e.into());
        }
    };

    let songs = count_songs(&pool).await.context("Failed to read music table")?;
    if songs == 0 {
        warn!("Music catalog is empty; run introquiz-seed to load songs");
    } else {
        info!("Music catalog has {} songs", songs);
    }

    let sessions = SessionStore::with_limits(
        Duration::from_secs(args.session_ttl_mins.saturating_mul(60)),
        args.max_sessions,
    );
    info!(
        "Session store: idle TTL {} min, capacity {}",
        args.session_ttl_mins, args.max_sessions
    );

    let state = AppState::with_sessions(pool, audio_dir(&root_folder), sessions);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.bind, args.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("introquiz-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
