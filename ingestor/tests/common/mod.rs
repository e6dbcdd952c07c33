#![allow(dead_code)]

use chrono::NaiveDate;
use ingestor::database::queries::QueryError;
use ingestor::delta::PriorLookup;
use ingestor::error::FetchError;
use ingestor::fetch::{Dataset, SourceFetcher};
use ingestor::models::{CanonicalFacility, InfectionStatus};
use ingestor::store::{RecordStore, StoreSession};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn status(date: NaiveDate, region: &str, daily: i64, cumulative: i64) -> InfectionStatus {
    InfectionStatus {
        date,
        region: region.to_string(),
        daily_delta: daily,
        cumulative_total: cumulative,
    }
}

/// Cumulative count payload with `(date, name_jp, npatients)` items.
pub fn cumulative_payload(items: &[(&str, &str, &str)]) -> String {
    let item_list: Vec<Value> = items
        .iter()
        .map(|(date, name, npatients)| json!({"date": date, "name_jp": name, "npatients": npatients}))
        .collect();
    json!({
        "errorInfo": {"errorFlag": "0", "errorCode": null, "errorMessage": null},
        "itemList": item_list,
    })
    .to_string()
}

/// Survey payload with `(facilityid, facilitytype, anstype)` responses.
pub fn survey_payload(responses: &[(&str, &str, &str)]) -> String {
    Value::Array(
        responses
            .iter()
            .map(|(id, service_type, answer)| {
                json!({
                    "facilityid": id,
                    "facilityname": format!("病院 {id}"),
                    "prefname": "東京都",
                    "facilitytype": service_type,
                    "anstype": answer,
                    "submitdate": "2023-01-02",
                })
            })
            .collect(),
    )
    .to_string()
}

/// Serves canned payloads. A date without a payload falls back to the
/// dataset's default, or answers 404 when there is none.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    payloads: Arc<Mutex<HashMap<(Dataset, NaiveDate), String>>>,
    defaults: Arc<Mutex<HashMap<Dataset, String>>>,
    pub calls: Arc<Mutex<Vec<(Dataset, NaiveDate)>>>,
}

impl FakeFetcher {
    pub fn with(self, dataset: Dataset, date: NaiveDate, body: impl Into<String>) -> Self {
        self.payloads.lock().insert((dataset, date), body.into());
        self
    }

    pub fn with_default(self, dataset: Dataset, body: impl Into<String>) -> Self {
        self.defaults.lock().insert(dataset, body.into());
        self
    }

    pub fn calls(&self) -> Vec<(Dataset, NaiveDate)> {
        self.calls.lock().clone()
    }
}

impl SourceFetcher for FakeFetcher {
    async fn fetch(&self, dataset: Dataset, date: NaiveDate) -> Result<String, FetchError> {
        self.calls.lock().push((dataset, date));
        let body = match self.payloads.lock().get(&(dataset, date)) {
            Some(body) => Some(body.clone()),
            None => self.defaults.lock().get(&dataset).cloned(),
        };
        match body {
            Some(body) if body.is_empty() => Err(FetchError::EmptyBody),
            Some(body) => Ok(body),
            None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Lookup(NaiveDate, String),
    Insert(&'static str),
}

#[derive(Default)]
pub struct FakeDb {
    pub infection_status: Vec<InfectionStatus>,
    pub facilities: Vec<CanonicalFacility>,
    pub events: Vec<Event>,
    /// Zero-based index of the insert attempt that fails.
    pub fail_insert_at: Option<usize>,
    pub fail_open: bool,
    pub inserts_attempted: usize,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
}

impl FakeDb {
    fn try_insert(&mut self, table: &'static str) -> Result<(), QueryError> {
        let attempt = self.inserts_attempted;
        self.inserts_attempted += 1;
        if self.fail_insert_at == Some(attempt) {
            return Err(QueryError::Db(sqlx::Error::PoolClosed));
        }
        self.events.push(Event::Insert(table));
        Ok(())
    }

    pub fn lookups(&self) -> Vec<(NaiveDate, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Lookup(date, region) => Some((*date, region.clone())),
                Event::Insert(_) => None,
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeStore {
    pub db: Arc<Mutex<FakeDb>>,
}

impl FakeStore {
    pub fn seeded(rows: Vec<InfectionStatus>) -> Self {
        let store = Self::default();
        store.db.lock().infection_status = rows;
        store
    }
}

pub struct FakeSession {
    db: Arc<Mutex<FakeDb>>,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.db.lock().sessions_closed += 1;
    }
}

impl RecordStore for FakeStore {
    type Session = FakeSession;

    async fn open_session(&self) -> Result<FakeSession, QueryError> {
        let mut db = self.db.lock();
        if db.fail_open {
            return Err(QueryError::Db(sqlx::Error::PoolTimedOut));
        }
        db.sessions_opened += 1;
        Ok(FakeSession {
            db: Arc::clone(&self.db),
        })
    }
}

impl PriorLookup for FakeSession {
    type Error = QueryError;

    async fn prior_cumulative(
        &mut self,
        date: NaiveDate,
        region: &str,
    ) -> Result<Option<i64>, QueryError> {
        let mut db = self.db.lock();
        db.events.push(Event::Lookup(date, region.to_string()));
        // Newest row wins, as with the created_at ordering in Postgres
        Ok(db
            .infection_status
            .iter()
            .rev()
            .find(|s| s.date == date && s.region == region)
            .map(|s| s.cumulative_total))
    }
}

impl StoreSession for FakeSession {
    async fn insert_facility(&mut self, facility: &CanonicalFacility) -> Result<u64, QueryError> {
        let mut db = self.db.lock();
        db.try_insert("facility")?;
        db.facilities.push(facility.clone());
        Ok(1)
    }

    async fn insert_infection_status(
        &mut self,
        status: &InfectionStatus,
    ) -> Result<u64, QueryError> {
        let mut db = self.db.lock();
        db.try_insert("infection_status")?;
        db.infection_status.push(status.clone());
        Ok(1)
    }
}
