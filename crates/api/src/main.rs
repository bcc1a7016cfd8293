//! API server entry point.

use std::sync::Arc;

use api::config::{Config, LogConfig, StoreBackend};
use api::{AppState, create_app};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderRepository, OrderRepository, PostgresOrderRepository};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<R: OrderRepository + 'static>(
    config: &Config,
    repository: R,
    metrics_handle: PrometheusHandle,
) {
    let state = Arc::new(AppState::from_config(config, repository));
    let app = create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, environment = %config.log.environment, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load .env (if any) and initialize tracing
    let dotenv = dotenvy::dotenv();
    let log = LogConfig::from_env();
    let json_logs = !log.is_development();
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&log.filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    if let Err(err) = &dotenv {
        if !err.not_found() {
            tracing::warn!(error = %err, "failed to read .env file");
        }
    }

    // 2. Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Pick the order store and serve
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory order store; orders are lost on restart");
            serve(&config, InMemoryOrderRepository::new(), metrics_handle).await;
        }
        StoreBackend::Postgres => {
            let pool = match config
                .database
                .pool_options()
                .connect_with(config.database.connect_options())
                .await
            {
                Ok(pool) => pool,
                Err(err) => {
                    tracing::error!(error = %err, "failed to connect to database");
                    std::process::exit(1);
                }
            };

            let repository = PostgresOrderRepository::new(pool);
            if let Err(err) = repository.run_migrations().await {
                tracing::error!(error = %err, "failed to run migrations");
                std::process::exit(1);
            }
            tracing::info!("database migrations applied");

            serve(&config, repository, metrics_handle).await;
        }
    }
}
