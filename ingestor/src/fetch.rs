use crate::error::FetchError;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use shared::SourceConfig;
use shared::opendata::QUERY_DATE_FORMAT;
use std::future::Future;
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    CumulativeCounts,
    FacilitySurvey,
}

/// Retrieves the raw payload for one dataset and day. Parsing is left to the
/// caller so that transport failures and malformed bodies stay distinguishable.
pub trait SourceFetcher: Send + Sync {
    fn fetch(
        &self,
        dataset: Dataset,
        date: NaiveDate,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct HttpSourceFetcher {
    client: Client,
    config: SourceConfig,
}

impl HttpSourceFetcher {
    pub fn new(client: Client, config: SourceConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::CumulativeCounts => &self.config.cumulative_endpoint,
            Dataset::FacilitySurvey => &self.config.survey_endpoint,
        }
    }
}

impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, dataset: Dataset, date: NaiveDate) -> Result<String, FetchError> {
        let endpoint = self.endpoint(dataset);
        debug!(endpoint, %date, ?dataset, "fetching source payload");

        let resp = self
            .client
            .get(endpoint)
            .query(&[("date", date.format(QUERY_DATE_FORMAT).to_string())])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.text().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        debug!(bytes = body.len(), "fetched source payload");
        Ok(body)
    }
}
