use crate::error::ParseError;
use chrono::NaiveDate;
use serde::Serialize;
use shared::opendata::ITEM_DATE_FORMAT;
use shared::opendata::covid::CumulativeCountItem;
use shared::opendata::survey::FacilityDetails;

/// One row per facility id after merging its per-service-type responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFacility {
    pub facility_id: String,
    #[serde(flatten)]
    pub details: FacilityDetails,
    pub hospitalization: Option<String>,
    pub outpatient: Option<String>,
    pub emergency: Option<String>,
}

impl CanonicalFacility {
    pub fn new(facility_id: impl Into<String>, details: FacilityDetails) -> Self {
        Self {
            facility_id: facility_id.into(),
            details,
            hospitalization: None,
            outpatient: None,
            emergency: None,
        }
    }
}

/// A prefecture's running total as reported by the source for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeCount {
    pub date: NaiveDate,
    pub region: String,
    pub cumulative_total: i64,
}

impl TryFrom<&CumulativeCountItem> for CumulativeCount {
    type Error = ParseError;

    fn try_from(item: &CumulativeCountItem) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&item.date, ITEM_DATE_FORMAT).map_err(|source| {
            ParseError::Date {
                value: item.date.clone(),
                source,
            }
        })?;
        let cumulative_total =
            item.npatients
                .trim()
                .parse::<i64>()
                .map_err(|source| ParseError::Count {
                    value: item.npatients.clone(),
                    region: item.name_jp.clone(),
                    source,
                })?;
        if cumulative_total < 0 {
            return Err(ParseError::NegativeCount {
                value: cumulative_total,
                region: item.name_jp.clone(),
            });
        }

        Ok(Self {
            date,
            region: item.name_jp.clone(),
            cumulative_total,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfectionStatus {
    pub date: NaiveDate,
    #[serde(rename = "prefecture")]
    pub region: String,
    /// Negative when the source revised an earlier total downward.
    pub daily_delta: i64,
    pub cumulative_total: i64,
}
