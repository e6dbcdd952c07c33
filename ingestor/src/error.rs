use crate::database::queries::QueryError;
use chrono::NaiveDate;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("source responded with non-success status {0}")]
    Status(reqwest::StatusCode),
    #[error("no body in source response")]
    EmptyBody,
    #[error("source reported an error (code {code:?}): {message:?}")]
    Upstream {
        code: Option<String>,
        message: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
    #[error("invalid cumulative count {value:?} for {region}: {source}")]
    Count {
        value: String,
        region: String,
        source: ParseIntError,
    },
    #[error("negative cumulative count {value} for {region}")]
    NegativeCount { value: i64, region: String },
}

#[derive(Debug, Error)]
#[error("no mapping for service type {0:?}")]
pub struct UnknownServiceType(pub String);

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("prior value lookup failed for {region} on {date}: {source}")]
    Lookup {
        date: NaiveDate,
        region: String,
        source: QueryError,
    },
    #[error("insert into {table} failed: {source}")]
    Persist {
        table: &'static str,
        source: QueryError,
    },
    #[error(transparent)]
    UnknownServiceType(#[from] UnknownServiceType),
    #[error("could not open store session: {0}")]
    Session(#[source] QueryError),
}

impl IngestError {
    /// Stable short name reported to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Fetch(_) => "fetch",
            IngestError::Parse(_) => "parse",
            IngestError::Lookup { .. } => "lookup",
            IngestError::Persist { .. } => "persist",
            IngestError::UnknownServiceType(_) => "unknown_service_type",
            IngestError::Session(_) => "session",
        }
    }
}

/// A failed run. Rows inserted before the failure stay committed.
#[derive(Debug, Error)]
#[error("ingestion aborted after {rows_written} rows written: {source}")]
pub struct RunError {
    pub rows_written: u64,
    pub source: IngestError,
}
