pub mod opendata;

use crate::error::{ConfigError, InitializationError};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub const ENV_VAR_PREFIX: &str = "COVID_INGEST__";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub postgres: PostgresConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub scheduler: Option<SchedulerConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Upstream open-data endpoints. Both are queried with a `date=YYYYMMDD` parameter.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_cumulative_endpoint")]
    pub cumulative_endpoint: String,
    #[serde(default = "default_survey_endpoint")]
    pub survey_endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            cumulative_endpoint: default_cumulative_endpoint(),
            survey_endpoint: default_survey_endpoint(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_cumulative_endpoint() -> String {
    opendata::CUMULATIVE_COUNTS_ENDPOINT.to_string()
}

fn default_survey_endpoint() -> String {
    opendata::FACILITY_SURVEY_ENDPOINT.to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error(transparent)]
        Migration(#[from] sqlx::migrate::MigrateError),
        #[error(transparent)]
        Db(#[from] sqlx::Error),
    }
}

#[instrument(skip_all)]
pub async fn initialize_db(
    pg_config: &PostgresConfig,
    migrate: bool,
) -> Result<Pool<Postgres>, InitializationError> {
    let pool = PgPoolOptions::new()
        .max_connections(pg_config.max_connections)
        .connect(&pg_config.connection_string)
        .await?;

    info!("db pool created and connected");

    // Run any new migrations
    if migrate {
        sqlx::migrate!("../migrations").run(&pool).await?;
    }

    Ok(pool)
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
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
        _ = ctrl_c => info!("received Ctrl+C signal, shutting down"),
        _ = terminate => info!("received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}
