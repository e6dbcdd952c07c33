pub mod covid;
pub mod survey;

pub const CUMULATIVE_COUNTS_ENDPOINT: &str = "https://opendata.corona.go.jp/api/Covid19JapanAll";
pub const FACILITY_SURVEY_ENDPOINT: &str = "https://opendata.corona.go.jp/api/covid19DailySurvey";

/// Format of the `date` query parameter accepted by both endpoints.
pub const QUERY_DATE_FORMAT: &str = "%Y%m%d";

/// Format of the `date` field inside cumulative count items.
pub const ITEM_DATE_FORMAT: &str = "%Y-%m-%d";
