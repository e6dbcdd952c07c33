//! The canonical record store as seen by the orchestrator.

use crate::database::queries::QueryError;
use crate::delta::PriorLookup;
use crate::models::{CanonicalFacility, InfectionStatus};
use std::future::Future;

pub trait RecordStore: Send + Sync {
    type Session: StoreSession;

    /// Acquires the connection-scoped session for one run. Dropping the session
    /// releases it.
    fn open_session(&self) -> impl Future<Output = Result<Self::Session, QueryError>> + Send;
}

/// Each insert is its own statement; nothing groups them into a transaction.
pub trait StoreSession: PriorLookup<Error = QueryError> + Send {
    /// Returns the number of affected rows.
    fn insert_facility(
        &mut self,
        facility: &CanonicalFacility,
    ) -> impl Future<Output = Result<u64, QueryError>> + Send;

    fn insert_infection_status(
        &mut self,
        status: &InfectionStatus,
    ) -> impl Future<Output = Result<u64, QueryError>> + Send;
}
