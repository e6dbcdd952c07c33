use crate::api::AppState;
use crate::api::error::ApiError;
use crate::error::RunError;
use crate::fetch::SourceFetcher;
use crate::health::HealthState;
use crate::models::{CanonicalFacility, InfectionStatus};
use crate::orchestrator::{BatchSpec, IngestionReport};
use crate::store::RecordStore;
use axum::Json;
use axum::extract::State;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::opendata::QUERY_DATE_FORMAT;

#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    pub dates: Vec<String>,
}

impl TryFrom<DatesRequest> for BatchSpec {
    type Error = ApiError;

    fn try_from(request: DatesRequest) -> Result<Self, Self::Error> {
        let mut dates = request
            .dates
            .into_iter()
            .map(|value| {
                NaiveDate::parse_from_str(&value, QUERY_DATE_FORMAT)
                    .map_err(|_| ApiError::InvalidDate(value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match dates.len() {
            0 => Err(ApiError::NoDates),
            1 => Ok(BatchSpec::Single(dates.remove(0))),
            _ => Ok(BatchSpec::Dates(dates)),
        }
    }
}

type ApiResult<T> = Result<Json<IngestionReport<T>>, ApiError>;

fn record_attempt(health: &HealthState) {
    if health.tracks_api_runs() {
        health.record_attempt();
    }
}

fn record<T>(
    health: &HealthState,
    result: Result<IngestionReport<T>, RunError>,
) -> ApiResult<T> {
    if health.tracks_api_runs() {
        match &result {
            Ok(_) => health.record_success(),
            Err(e) => health.record_failure(e),
        }
    }
    Ok(Json(result?))
}

pub async fn ingest_infection_status<F, S>(
    State(state): State<AppState<F, S>>,
    Json(request): Json<DatesRequest>,
) -> ApiResult<InfectionStatus>
where
    F: SourceFetcher,
    S: RecordStore,
{
    let batch = BatchSpec::try_from(request)?;
    record_attempt(&state.health);
    record(
        &state.health,
        state.orchestrator.run_infection_status(&batch).await,
    )
}

pub async fn ingest_yesterday<F, S>(State(state): State<AppState<F, S>>) -> ApiResult<InfectionStatus>
where
    F: SourceFetcher,
    S: RecordStore,
{
    let batch = BatchSpec::previous_day(Utc::now().date_naive());
    record_attempt(&state.health);
    record(
        &state.health,
        state.orchestrator.run_infection_status(&batch).await,
    )
}

pub async fn register_facilities<F, S>(
    State(state): State<AppState<F, S>>,
    body: String,
) -> ApiResult<CanonicalFacility>
where
    F: SourceFetcher,
    S: RecordStore,
{
    record_attempt(&state.health);
    record(
        &state.health,
        state.orchestrator.register_facilities(&body).await,
    )
}

pub async fn sync_facilities<F, S>(
    State(state): State<AppState<F, S>>,
    Json(request): Json<DatesRequest>,
) -> ApiResult<CanonicalFacility>
where
    F: SourceFetcher,
    S: RecordStore,
{
    let batch = BatchSpec::try_from(request)?;
    record_attempt(&state.health);
    record(&state.health, state.orchestrator.run_facility(&batch).await)
}
