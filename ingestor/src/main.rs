use ingestor::api::{AppState, router};
use ingestor::health::HealthState;
use ingestor::orchestrator::Orchestrator;
use ingestor::scheduler::scheduler_loop;
use shared::error::InitializationError;
use shared::{initialize_db, load_config, shutdown_listener};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    let config = load_config().map_err(InitializationError::Config)?;
    info!(
        listen_addr = config.server.listen_addr,
        scheduler = ?config.scheduler,
        "configuration loaded"
    );

    let db_pool = initialize_db(&config.postgres, true).await?;
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("covid-ingest/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(MainError::HttpClient)?;

    let orchestrator = Arc::new(Orchestrator::from_config(&config, http_client, db_pool));
    let health = HealthState::new(config.scheduler.is_some());

    // Cancellation token shared across tasks; listener cancels on SIGINT/SIGTERM.
    let shutdown_token = CancellationToken::new();
    let signal_handle = tokio::spawn(shutdown_listener(Some(shutdown_token.clone())));

    let scheduler_handle = config.scheduler.as_ref().map(|scheduler| {
        tokio::spawn(scheduler_loop(
            Arc::clone(&orchestrator),
            health.clone(),
            Duration::from_secs(scheduler.interval_seconds),
            shutdown_token.clone(),
        ))
    });

    let app = router(AppState {
        orchestrator,
        health,
    });
    let listener = TcpListener::bind(&config.server.listen_addr).await?;
    info!(listen_addr = config.server.listen_addr, "starting ingestion server");
    let server_token = shutdown_token.clone();
    let axum_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                server_token.cancelled().await;
            })
            .await
    });

    tokio::select! {
        res = axum_handle => {
            shutdown_token.cancel();
            res??;
        }
        res = signal_handle => {
            shutdown_token.cancel();
            res?;
        }
    }

    // Let an in-flight scheduled run finish before exiting.
    if let Some(handle) = scheduler_handle {
        handle.await?;
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error(transparent)]
    Init(#[from] InitializationError),
    #[error("could not build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}
