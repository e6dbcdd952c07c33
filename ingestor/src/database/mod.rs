pub mod queries;

use crate::database::queries::{
    QueryError, get_prior_cumulative, insert_facility, insert_infection_status,
};
use crate::delta::PriorLookup;
use crate::models::{CanonicalFacility, InfectionStatus};
use crate::store::{RecordStore, StoreSession};
use chrono::NaiveDate;
use sqlx::pool::PoolConnection;
use sqlx::{Pool, Postgres};
use tracing::trace;

#[derive(Clone)]
pub struct PgRecordStore {
    pool: Pool<Postgres>,
}

impl PgRecordStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Holds one pooled connection; it goes back to the pool on drop.
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

impl RecordStore for PgRecordStore {
    type Session = PgSession;

    async fn open_session(&self) -> Result<PgSession, QueryError> {
        let conn = self.pool.acquire().await?;
        trace!("acquired store session");
        Ok(PgSession { conn })
    }
}

impl PriorLookup for PgSession {
    type Error = QueryError;

    async fn prior_cumulative(
        &mut self,
        date: NaiveDate,
        region: &str,
    ) -> Result<Option<i64>, QueryError> {
        get_prior_cumulative(&mut *self.conn, date, region).await
    }
}

impl StoreSession for PgSession {
    async fn insert_facility(&mut self, facility: &CanonicalFacility) -> Result<u64, QueryError> {
        insert_facility(&mut *self.conn, facility).await
    }

    async fn insert_infection_status(
        &mut self,
        status: &InfectionStatus,
    ) -> Result<u64, QueryError> {
        insert_infection_status(&mut *self.conn, status).await
    }
}
