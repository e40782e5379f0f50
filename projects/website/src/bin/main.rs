use std::sync::Arc;

use anyhow::Result;
use axum::serve;
use interfaces_content_query::ContentStore;
use projects_website::{
    config::{Config, ConfigError},
    db::store::PgStatsStore,
    router, AppState,
};
use thiserror::Error;
use tracing::{error, info};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadDotenv: {source}")]
    LoadDotenv {
        #[source]
        source: dotenvy::Error,
    },
    #[error("Config: {source}")]
    Config {
        #[source]
        source: ConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    if let Err(source) = dotenvy::dotenv() {
        if !source.not_found() {
            return Err(MainError::LoadDotenv { source });
        }
    }

    let config = Config::from_env().map_err(|source| MainError::Config { source })?;

    tracing_init(&config.log_level, config.log_format)
        .map_err(|source| MainError::TracingInit { source })?;

    let state = AppState::new(
        Arc::new(PgStatsStore::new(config.db_pool_size)),
        config.store_targets.clone(),
        ContentStore::open(&config.content_dir),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!(content_dir = %config.content_dir.display(), "Server running on addr: {}", config.bind_addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| MainError::Serve { source })?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
