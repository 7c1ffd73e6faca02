mod cli;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use inventory_gateway::{App, AppState};
use inventory_storage::{InMemoryRepository, MySqlRepository, PoolSettings, ProductRepository};
use tracing::info;

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cors_origin = %config.cors_origin,
        "starting inventory gateway"
    );

    let allowed_origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("invalid CORS origin '{}'", config.cors_origin))?;

    let repository = open_repository(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let app = App::service(AppState::new(Arc::clone(&repository)), allowed_origin);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repository.close().await;
    info!("storage closed, bye");

    served.context("server terminated with an error")
}

async fn open_repository(config: &CLI) -> anyhow::Result<Arc<dyn ProductRepository>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryRepository::new())),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let settings = PoolSettings::builder()
                .max_connections(config.mysql_max_connections)
                .acquire_timeout(Duration::from_secs(config.mysql_acquire_timeout_secs))
                .build();

            let repository = MySqlRepository::connect_with(mysql_dsn, settings)
                .await
                .context("failed to connect to MySQL")?;
            if config.run_migrations {
                repository
                    .migrate()
                    .await
                    .context("failed to apply products schema")?;
                info!("products schema is up to date");
            }

            Ok(Arc::new(repository))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
