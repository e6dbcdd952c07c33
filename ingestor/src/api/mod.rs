pub mod error;
pub mod handlers;

use crate::fetch::SourceFetcher;
use crate::health::{HealthState, health_check};
use crate::orchestrator::Orchestrator;
use crate::store::RecordStore;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use handlers::{ingest_infection_status, ingest_yesterday, register_facilities, sync_facilities};
use std::sync::Arc;

pub struct AppState<F, S> {
    pub orchestrator: Arc<Orchestrator<F, S>>,
    pub health: HealthState,
}

// Derived Clone would require F: Clone and S: Clone
impl<F, S> Clone for AppState<F, S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            health: self.health.clone(),
        }
    }
}

impl<F, S> FromRef<AppState<F, S>> for HealthState {
    fn from_ref(state: &AppState<F, S>) -> Self {
        state.health.clone()
    }
}

pub fn router<F, S>(state: AppState<F, S>) -> Router
where
    F: SourceFetcher + 'static,
    S: RecordStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/v1", v1_routes())
        .with_state(state)
}

fn v1_routes<F, S>() -> Router<AppState<F, S>>
where
    F: SourceFetcher + 'static,
    S: RecordStore + 'static,
{
    Router::<AppState<F, S>>::new()
        .route("/infection-status", post(ingest_infection_status::<F, S>))
        .route("/infection-status/yesterday", post(ingest_yesterday::<F, S>))
        .route("/facilities", post(register_facilities::<F, S>))
        .route("/facilities/sync", post(sync_facilities::<F, S>))
}
