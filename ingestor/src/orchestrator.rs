//! Sequences fetch, reconcile or derive, and persist for each unit of work.
//!
//! A unit is one date. Units run in order on a single store session. The first
//! failing unit aborts the run; rows already inserted stay where they are and
//! later units are never attempted.

use crate::database::PgRecordStore;
use crate::delta::derive;
use crate::error::{FetchError, IngestError, ParseError, RunError};
use crate::fetch::{Dataset, HttpSourceFetcher, SourceFetcher};
use crate::models::{CanonicalFacility, CumulativeCount, InfectionStatus};
use crate::reconcile::reconcile;
use crate::store::{RecordStore, StoreSession};
use chrono::{Days, NaiveDate};
use reqwest::Client;
use serde::Serialize;
use shared::Config;
use shared::opendata::covid::CumulativeCountRoot;
use shared::opendata::survey::RawFacilityResponse;
use sqlx::{Pool, Postgres};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSpec {
    Single(NaiveDate),
    Dates(Vec<NaiveDate>),
}

impl BatchSpec {
    /// The day before `today`, which is the newest day the source has published.
    pub fn previous_day(today: NaiveDate) -> Self {
        BatchSpec::Single(today.checked_sub_days(Days::new(1)).unwrap_or(today))
    }

    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            BatchSpec::Single(date) => std::slice::from_ref(date),
            BatchSpec::Dates(dates) => dates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport<T> {
    pub rows_written: u64,
    pub records: Vec<T>,
}

impl<T> Default for IngestionReport<T> {
    fn default() -> Self {
        Self {
            rows_written: 0,
            records: Vec::new(),
        }
    }
}

pub struct Orchestrator<F, S> {
    fetcher: F,
    store: S,
}

impl Orchestrator<HttpSourceFetcher, PgRecordStore> {
    pub fn from_config(config: &Config, client: Client, pool: Pool<Postgres>) -> Self {
        Self::new(
            HttpSourceFetcher::new(client, config.source.clone()),
            PgRecordStore::new(pool),
        )
    }
}

impl<F, S> Orchestrator<F, S>
where
    F: SourceFetcher,
    S: RecordStore,
{
    pub fn new(fetcher: F, store: S) -> Self {
        Self { fetcher, store }
    }

    #[instrument(skip_all, fields(units = batch.dates().len()))]
    pub async fn run_infection_status(
        &self,
        batch: &BatchSpec,
    ) -> Result<IngestionReport<InfectionStatus>, RunError> {
        let mut session = self.open_session().await?;
        let mut report = IngestionReport::default();

        for &date in batch.dates() {
            if let Err(source) = self
                .infection_status_unit(&mut session, date, &mut report)
                .await
            {
                warn!(%date, error = ?source, rows_written = report.rows_written, "infection status ingestion aborted");
                return Err(RunError {
                    rows_written: report.rows_written,
                    source,
                });
            }
        }

        info!(rows_written = report.rows_written, "infection status ingestion complete");
        Ok(report)
    }

    /// Fetches the survey feed for each date and persists the reconciled
    /// facilities. Each date is merged on its own.
    #[instrument(skip_all, fields(units = batch.dates().len()))]
    pub async fn run_facility(
        &self,
        batch: &BatchSpec,
    ) -> Result<IngestionReport<CanonicalFacility>, RunError> {
        let mut session = self.open_session().await?;
        let mut report = IngestionReport::default();

        for &date in batch.dates() {
            if let Err(source) = self.facility_unit(&mut session, date, &mut report).await {
                warn!(%date, error = ?source, rows_written = report.rows_written, "facility ingestion aborted");
                return Err(RunError {
                    rows_written: report.rows_written,
                    source,
                });
            }
        }

        info!(rows_written = report.rows_written, "facility ingestion complete");
        Ok(report)
    }

    /// Reconciles and persists a survey payload supplied by the caller instead
    /// of the source.
    #[instrument(skip_all, fields(bytes = payload.len()))]
    pub async fn register_facilities(
        &self,
        payload: &str,
    ) -> Result<IngestionReport<CanonicalFacility>, RunError> {
        let mut session = self.open_session().await?;
        let mut report = IngestionReport::default();

        let result = match parse_survey(payload) {
            Ok(responses) => persist_facilities(&mut session, &responses, &mut report).await,
            Err(e) => Err(e.into()),
        };
        if let Err(source) = result {
            warn!(error = ?source, rows_written = report.rows_written, "facility registration aborted");
            return Err(RunError {
                rows_written: report.rows_written,
                source,
            });
        }

        info!(rows_written = report.rows_written, "facility registration complete");
        Ok(report)
    }

    async fn open_session(&self) -> Result<S::Session, RunError> {
        self.store.open_session().await.map_err(|e| RunError {
            rows_written: 0,
            source: IngestError::Session(e),
        })
    }

    async fn infection_status_unit(
        &self,
        session: &mut S::Session,
        date: NaiveDate,
        report: &mut IngestionReport<InfectionStatus>,
    ) -> Result<(), IngestError> {
        let body = self.fetcher.fetch(Dataset::CumulativeCounts, date).await?;
        let root: CumulativeCountRoot = serde_json::from_str(&body).map_err(ParseError::from)?;
        if root.error_info.is_error() {
            return Err(FetchError::Upstream {
                code: root.error_info.error_code,
                message: root.error_info.error_message,
            }
            .into());
        }

        let counts = root
            .item_list
            .iter()
            .map(CumulativeCount::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%date, regions = counts.len(), "parsed cumulative counts");

        // All lookups finish before the first insert of the unit
        let mut statuses = Vec::with_capacity(counts.len());
        for count in &counts {
            let status = derive(count, session)
                .await
                .map_err(|source| IngestError::Lookup {
                    date: count.date,
                    region: count.region.clone(),
                    source,
                })?;
            statuses.push(status);
        }

        let mut unit_rows = 0;
        for status in statuses {
            let rows = session
                .insert_infection_status(&status)
                .await
                .map_err(|source| IngestError::Persist {
                    table: "infection_status",
                    source,
                })?;
            unit_rows += rows;
            report.rows_written += rows;
            report.records.push(status);
        }

        info!(%date, rows = unit_rows, "inserted infection status rows");
        Ok(())
    }

    async fn facility_unit(
        &self,
        session: &mut S::Session,
        date: NaiveDate,
        report: &mut IngestionReport<CanonicalFacility>,
    ) -> Result<(), IngestError> {
        let body = self.fetcher.fetch(Dataset::FacilitySurvey, date).await?;
        let responses = parse_survey(&body)?;
        persist_facilities(session, &responses, report).await
    }
}

fn parse_survey(body: &str) -> Result<Vec<RawFacilityResponse>, ParseError> {
    Ok(serde_json::from_str(body)?)
}

async fn persist_facilities<T: StoreSession>(
    session: &mut T,
    responses: &[RawFacilityResponse],
    report: &mut IngestionReport<CanonicalFacility>,
) -> Result<(), IngestError> {
    let batch = reconcile(responses)?;
    debug!(
        responses = responses.len(),
        facilities = batch.len(),
        "reconciled survey responses"
    );

    let mut unit_rows = 0;
    for facility in batch.into_vec() {
        let rows = session
            .insert_facility(&facility)
            .await
            .map_err(|source| IngestError::Persist {
                table: "facility",
                source,
            })?;
        unit_rows += rows;
        report.rows_written += rows;
        report.records.push(facility);
    }

    info!(rows = unit_rows, "inserted facility rows");
    Ok(())
}
