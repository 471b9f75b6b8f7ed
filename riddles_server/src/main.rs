//! Riddles API server: loads config, connects the pool, serves with graceful shutdown.
//!
//! Config file path comes from `CONFIG_PATH` (default `config.json`); see
//! `config.example.json` for the layout. Environment variables override it.

use riddles_api::config::{self, DEFAULT_CONFIG_PATH};
use riddles_api::{app, connect, AppState, LogFormat, PgRiddleStore, RiddleStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = config::load(&config_path)?;
    init_tracing(config.log_format);
    config::validate(&config)?;
    tracing::debug!(config_path = %config_path.display(), config = ?config, "loaded config");

    let pool = connect(&config.database).await?;
    let store = PgRiddleStore::new(pool.clone());
    store.ping().await?;
    let state = AppState::new(Arc::new(store), &config);

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.server_port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "starting server");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move { shutdown.notified().await }
    });
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut handle => {
            res??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    tracing::info!("shutting down server");
    shutdown.notify_one();
    let grace = Duration::from_secs(config.shutdown_grace_secs);
    match tokio::time::timeout(grace, handle).await {
        Ok(res) => res??,
        Err(_) => tracing::error!(grace_secs = config.shutdown_grace_secs, "server forced to shutdown"),
    }
    pool.close().await;
    tracing::info!("server exiting");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("riddles_api=info,riddles_server=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
