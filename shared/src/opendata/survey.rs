use serde::{Deserialize, Deserializer, Serialize};

/// Service type labels used by the daily facility survey.
pub const INPATIENT_LABEL: &str = "入院";
pub const OUTPATIENT_LABEL: &str = "外来";
pub const EMERGENCY_LABEL: &str = "救急";

/// A single survey answer. One facility emits one of these per service type,
/// so the same `facility_id` normally appears up to three times in a payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawFacilityResponse {
    #[serde(rename = "facilityid")]
    pub facility_id: String,
    #[serde(rename = "facilitytype")]
    pub service_type: String,
    #[serde(rename = "anstype", default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(flatten)]
    pub details: FacilityDetails,
}

/// Descriptive fields shared by every response for the same facility.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FacilityDetails {
    #[serde(rename = "facilityname", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "zipcode", deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(rename = "prefname", deserialize_with = "null_as_default")]
    pub prefecture: String,
    #[serde(rename = "facilityaddr", deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "facilitytel", deserialize_with = "null_as_default")]
    pub tel: String,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: String,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: String,
    #[serde(rename = "submitdate", deserialize_with = "null_as_default")]
    pub submit_date: String,
    #[serde(rename = "localgovcode", deserialize_with = "null_as_default")]
    pub local_gov_code: String,
    #[serde(rename = "cityname", deserialize_with = "null_as_default")]
    pub city_name: String,
    #[serde(rename = "facilitycode", deserialize_with = "null_as_default")]
    pub facility_code: String,
}

/// The survey feed sends `null` for unanswered fields; those read as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
