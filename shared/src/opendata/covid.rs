use serde::{Deserialize, Serialize};

/// Body returned by the cumulative infection count endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeCountRoot {
    #[serde(default)]
    pub error_info: ErrorInfo,
    #[serde(default)]
    pub item_list: Vec<CumulativeCountItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ErrorInfo {
    pub error_flag: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl ErrorInfo {
    /// The upstream sets `errorFlag` to "1" when it could not serve the request.
    pub fn is_error(&self) -> bool {
        self.error_flag.as_deref() == Some("1")
    }
}

/// One prefecture's running total for one day. Every value arrives as a string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CumulativeCountItem {
    pub date: String,
    pub name_jp: String,
    pub npatients: String,
}
