use shared::opendata::covid::CumulativeCountRoot;
use shared::opendata::survey::{INPATIENT_LABEL, RawFacilityResponse};
use shared::opendata::{CUMULATIVE_COUNTS_ENDPOINT, QUERY_DATE_FORMAT};

const CUMULATIVE_PAYLOAD: &str = r#"{
    "errorInfo": {"errorFlag": "0", "errorCode": null, "errorMessage": null},
    "itemList": [
        {"date": "2023-01-02", "name_jp": "東京都", "npatients": "4223712"},
        {"date": "2023-01-02", "name_jp": "北海道", "npatients": "1843259"}
    ]
}"#;

const SURVEY_PAYLOAD: &str = r#"[
    {
        "facilityid": "0111710055",
        "facilityname": "札幌市立病院",
        "zipcode": "060-8604",
        "prefname": "北海道",
        "facilityaddr": "札幌市中央区北11条西13-1-1",
        "facilitytel": "011-726-2211",
        "latitude": "43.0691",
        "longitude": "141.3317",
        "submitdate": "2023-01-02",
        "localgovcode": "011002",
        "cityname": "札幌市",
        "facilitycode": "0111710055",
        "facilitytype": "入院",
        "anstype": "通常"
    }
]"#;

#[test]
fn cumulative_payload_deserializes() {
    let root: CumulativeCountRoot = serde_json::from_str(CUMULATIVE_PAYLOAD).unwrap();
    assert!(!root.error_info.is_error());
    assert!(root.error_info.error_code.is_none());
    assert_eq!(root.item_list.len(), 2);
    assert_eq!(root.item_list[0].name_jp, "東京都");
    assert_eq!(root.item_list[0].npatients, "4223712");
}

#[test]
fn cumulative_payload_without_error_info_defaults() {
    let root: CumulativeCountRoot = serde_json::from_str(r#"{"itemList": []}"#).unwrap();
    assert!(!root.error_info.is_error());
    assert!(root.item_list.is_empty());
}

#[test]
fn cumulative_payload_reports_upstream_error() {
    let root: CumulativeCountRoot = serde_json::from_str(
        r#"{"errorInfo": {"errorFlag": "1", "errorCode": "ERR01", "errorMessage": "bad date"}}"#,
    )
    .unwrap();
    assert!(root.error_info.is_error());
    assert_eq!(root.error_info.error_message.as_deref(), Some("bad date"));
}

#[test]
fn survey_payload_deserializes() {
    let responses: Vec<RawFacilityResponse> = serde_json::from_str(SURVEY_PAYLOAD).unwrap();
    assert_eq!(responses.len(), 1);
    let response = &responses[0];
    assert_eq!(response.facility_id, "0111710055");
    assert_eq!(response.service_type, INPATIENT_LABEL);
    assert_eq!(response.answer, "通常");
    assert_eq!(response.details.prefecture, "北海道");
    assert_eq!(response.details.city_name, "札幌市");
}

#[test]
fn survey_response_tolerates_missing_descriptive_fields() {
    let responses: Vec<RawFacilityResponse> =
        serde_json::from_str(r#"[{"facilityid": "A", "facilitytype": "救急"}]"#).unwrap();
    assert_eq!(responses[0].answer, "");
    assert_eq!(responses[0].details.name, "");
}

#[test]
fn survey_response_reads_null_fields_as_empty() {
    let responses: Vec<RawFacilityResponse> = serde_json::from_str(
        r#"[{
            "facilityid": "A",
            "facilitytype": "入院",
            "anstype": null,
            "facilityname": "病院 A",
            "facilitytel": null,
            "latitude": null,
            "longitude": null
        }]"#,
    )
    .unwrap();
    assert_eq!(responses[0].answer, "");
    assert_eq!(responses[0].details.name, "病院 A");
    assert_eq!(responses[0].details.tel, "");
    assert_eq!(responses[0].details.latitude, "");
}

#[test]
fn survey_response_requires_facility_id_and_type() {
    assert!(
        serde_json::from_str::<Vec<RawFacilityResponse>>(
            r#"[{"facilityid": null, "facilitytype": "入院"}]"#
        )
        .is_err()
    );
    assert!(
        serde_json::from_str::<Vec<RawFacilityResponse>>(
            r#"[{"facilityid": "A", "facilitytype": null}]"#
        )
        .is_err()
    );
}

#[tokio::test]
#[ignore = "hits the live open-data endpoint"]
async fn verify_live_cumulative_dtos() -> Result<(), reqwest::Error> {
    let date = chrono::Utc::now().date_naive() - chrono::Days::new(2);
    let res = reqwest::Client::new()
        .get(CUMULATIVE_COUNTS_ENDPOINT)
        .query(&[("date", date.format(QUERY_DATE_FORMAT).to_string())])
        .send()
        .await?
        .json::<CumulativeCountRoot>()
        .await?;
    assert!(!res.error_info.is_error());
    Ok(())
}
