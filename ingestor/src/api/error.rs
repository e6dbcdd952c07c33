use crate::error::{IngestError, RunError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub status_code: u16,
    pub kind: &'static str,
    pub message: String,
    pub rows_written: u64,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no dates given")]
    NoDates,
    #[error("invalid date {0:?}, expected YYYYMMDD")]
    InvalidDate(String),
    #[error(transparent)]
    Run(#[from] RunError),
}

fn error_into_response(
    code: StatusCode,
    kind: &'static str,
    message: impl Into<String>,
    rows_written: u64,
) -> Response {
    (
        code,
        Json(ErrorMessage {
            status_code: code.into(),
            kind,
            message: message.into(),
            rows_written,
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NoDates => {
                warn!("request without dates");
                error_into_response(StatusCode::BAD_REQUEST, "request", self.to_string(), 0)
            }
            ApiError::InvalidDate(ref value) => {
                warn!(value, "request with invalid date");
                error_into_response(StatusCode::BAD_REQUEST, "request", self.to_string(), 0)
            }
            ApiError::Run(e) => {
                let code = match &e.source {
                    IngestError::Fetch(_) => StatusCode::BAD_GATEWAY,
                    IngestError::Parse(_) | IngestError::UnknownServiceType(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    IngestError::Lookup { .. }
                    | IngestError::Persist { .. }
                    | IngestError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                error_into_response(code, e.source.kind(), e.source.to_string(), e.rows_written)
            }
        }
    }
}
