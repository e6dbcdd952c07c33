use crate::error::RunError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Outcome of the most recent ingestion runs, shared between the API handlers,
/// the scheduler and the health endpoint.
#[derive(Clone, Default)]
pub struct HealthState {
    scheduled: bool,
    last_attempted_run: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_successful_run: Arc<RwLock<Option<DateTime<Utc>>>>,
    last_error: Arc<RwLock<Option<String>>>,
}

impl HealthState {
    /// With `scheduled` set, only scheduler runs are recorded and the absence
    /// of any attempted run is unhealthy.
    pub fn new(scheduled: bool) -> Self {
        Self {
            scheduled,
            ..Self::default()
        }
    }

    /// Ad-hoc API runs count toward health only when no scheduler is running.
    pub fn tracks_api_runs(&self) -> bool {
        !self.scheduled
    }

    pub fn record_attempt(&self) {
        *self.last_attempted_run.write() = Some(Utc::now());
    }

    pub fn record_success(&self) {
        *self.last_successful_run.write() = Some(Utc::now());
        *self.last_error.write() = None;
    }

    pub fn record_failure(&self, error: &RunError) {
        *self.last_error.write() = Some(error.to_string());
    }
}

pub async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    let last_attempted_run = *state.last_attempted_run.read();
    let last_successful_run = *state.last_successful_run.read();
    let last_error = state.last_error.read().clone();

    let Some(last_attempted_run) = last_attempted_run else {
        return if state.scheduled {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No ingestion runs attempted yet".to_string(),
            )
        } else {
            (StatusCode::OK, "No ingestion runs attempted yet".to_string())
        };
    };

    let last_successful_run = last_successful_run
        .map(|t| t.to_string())
        .unwrap_or_else(|| "never".to_string());

    match last_error {
        Some(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!(
                "Last ingestion run failed. Last attempted run: {last_attempted_run}. Last successful run: {last_successful_run}. Last error: {error}"
            ),
        ),
        None => (
            StatusCode::OK,
            format!("Last ingestion run succeeded: {last_successful_run}"),
        ),
    }
}
