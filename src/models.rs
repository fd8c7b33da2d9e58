//! Data models for the disclosure pipeline.
//!
//! This module defines the records that flow between pipeline stages:
//! - [`StationRow`], [`CheckedStationRow`], [`StatusStationRow`]: the CSV
//!   station roster as it accumulates columns through the early stages
//! - [`Facility`] and friends: the FCC facility-search API response
//! - [`AdEntry`]: a raw public-file feed entry
//! - [`TaggedRecord`] / [`StandardizedRecord`] / [`MinimalRecord`]: the
//!   JSON record as it moves through tagging, sponsor normalization, and
//!   the final heatmap export
//!
//! CSV field names carry human-readable headers (`"City Match"`,
//! `"FCC URL"`, ...), and the FCC API models use camelCase renames to
//! match the upstream JSON schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A radio station row scraped from the station directory.
///
/// One row per station, grouped by state and city on the directory page.
/// Serialized to CSV with the headers `State, City, Station, Format`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationRow {
    /// Full state name as it appears in the directory (e.g. "Georgia").
    #[serde(rename = "State")]
    pub state: String,
    /// City of license.
    #[serde(rename = "City")]
    pub city: String,
    /// Station identifier, possibly with a band suffix ("KPWR-FM") or a
    /// simulcast pair ("WQHT/WBLS").
    #[serde(rename = "Station")]
    pub station: String,
    /// Free-text format description from the directory.
    #[serde(rename = "Format")]
    pub format: String,
}

/// A station row annotated with FCC facility-match results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckedStationRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Format")]
    pub format: String,
    /// "Yes" when the first matched facility's community city equals the
    /// directory city, otherwise "No".
    #[serde(rename = "City Match")]
    pub city_match: String,
    /// "Yes" when the facility's state abbreviation matches the directory
    /// state, otherwise "No".
    #[serde(rename = "State Match")]
    pub state_match: String,
    /// Public-file feed URL derived from the facility's service code and
    /// call sign; empty when no facility matched.
    #[serde(rename = "FCC URL")]
    pub fcc_url: String,
}

/// A checked station row plus the HTTP status of its public-file feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusStationRow {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Format")]
    pub format: String,
    #[serde(rename = "City Match")]
    pub city_match: String,
    #[serde(rename = "State Match")]
    pub state_match: String,
    #[serde(rename = "FCC URL")]
    pub fcc_url: String,
    /// Numeric HTTP status as a string, "N/A" when the row has no URL, or
    /// empty when the request itself failed.
    #[serde(rename = "HTTP Status Code")]
    pub http_status: String,
}

/// Top-level response of the FCC facility search endpoint.
#[derive(Debug, Deserialize)]
pub struct FacilitySearchResponse {
    pub results: FacilitySearchResults,
}

#[derive(Debug, Deserialize)]
pub struct FacilitySearchResults {
    #[serde(rename = "globalSearchResults")]
    pub global_search_results: GlobalSearchResults,
}

/// Facility lists bucketed by service; each list is nullable upstream.
#[derive(Debug, Default, Deserialize)]
pub struct GlobalSearchResults {
    #[serde(rename = "amFacilityList", default)]
    pub am_facility_list: Option<Vec<Facility>>,
    #[serde(rename = "fmFacilityList", default)]
    pub fm_facility_list: Option<Vec<Facility>>,
    #[serde(rename = "tvFacilityList", default)]
    pub tv_facility_list: Option<Vec<Facility>>,
}

impl GlobalSearchResults {
    /// First facility across the AM, FM, and TV lists, in that order.
    ///
    /// The search endpoint returns candidates ranked by relevance, so the
    /// first entry is taken as the match for the station being looked up.
    pub fn first_facility(&self) -> Option<&Facility> {
        self.am_facility_list
            .iter()
            .flatten()
            .chain(self.fm_facility_list.iter().flatten())
            .chain(self.tv_facility_list.iter().flatten())
            .next()
    }
}

/// A single broadcast facility from the FCC search results.
#[derive(Debug, Clone, Deserialize)]
pub struct Facility {
    #[serde(rename = "callSign", default)]
    pub call_sign: String,
    #[serde(rename = "serviceCode", default)]
    pub service_code: String,
    #[serde(rename = "communityCity", default)]
    pub community_city: String,
    #[serde(rename = "communityState", default)]
    pub community_state: String,
}

/// A raw filing entry pulled from a station's public-file feed.
///
/// Fields parsed out of the entry title (`facility_id`, `office`,
/// `sponsor`) are best-effort at ingest time; the tagging stage re-derives
/// office and sponsor from the file path with full classification rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdEntry {
    pub title: String,
    pub url: String,
    pub id: String,
    pub updated: String,
    pub facility_id: Option<i64>,
    pub office: Option<String>,
    pub sponsor: Option<String>,
    pub station_url: String,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Classification of a filing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// A filing under `Political Files/` (candidate advertising).
    PoliticalAd,
    /// A filing under the political-matters and controversial-issues tree.
    PoliticalMatters,
    /// Any other public-file upload (EEO, FCC administrative, ...).
    NonPolitical,
    /// The title did not contain a parseable file path.
    Unknown,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordType::PoliticalAd => "political_ad",
            RecordType::PoliticalMatters => "political_matters",
            RecordType::NonPolitical => "non_political",
            RecordType::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A filing record after tagging and cleanup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaggedRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub updated: String,
    pub record_type: RecordType,
    pub facility_id: Option<i64>,
    /// Station call sign recovered from the entry id or URL.
    pub station: Option<String>,
    /// Filing year recovered from the file path.
    pub year: Option<i32>,
    pub office: Option<String>,
    pub sponsor: Option<String>,
    /// The public-file path parsed out of the entry title.
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_url: Option<String>,
}

/// A tagged record plus its normalized sponsor name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StandardizedRecord {
    #[serde(flatten)]
    pub record: TaggedRecord,
    pub sponsor_normalized: Option<String>,
}

/// The minimal projection consumed by the heatmap page.
///
/// Every field here is used by a filter or axis on the static page;
/// everything else is dropped to keep the deployed file small.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MinimalRecord {
    pub record_type: RecordType,
    pub station: Option<String>,
    pub sponsor_normalized: Option<String>,
    pub office: Option<String>,
    pub year: Option<i32>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub updated: String,
}

impl From<&StandardizedRecord> for MinimalRecord {
    fn from(standardized: &StandardizedRecord) -> Self {
        let record = &standardized.record;
        MinimalRecord {
            record_type: record.record_type,
            station: record.station.clone(),
            sponsor_normalized: standardized.sponsor_normalized.clone(),
            office: record.office.clone(),
            year: record.year,
            state: record.state.clone(),
            city: record.city.clone(),
            updated: record.updated.clone(),
        }
    }
}

/// Summary and per-category breakdown of non-political filings.
#[derive(Debug, Serialize)]
pub struct NonPoliticalAnalysis {
    pub summary: NonPoliticalSummary,
    /// Categories ordered by descending record count; a trailing
    /// "Malformed Titles" group collects entries without a parseable path.
    pub categories: Vec<CategoryGroup>,
}

#[derive(Debug, Serialize)]
pub struct NonPoliticalSummary {
    pub total_records: usize,
    pub political_files: usize,
    pub non_political_files: usize,
    pub malformed: usize,
}

/// All records sharing one top-level public-file path segment.
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub count: usize,
    pub records: Vec<AdEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_serialization() {
        let json = serde_json::to_string(&RecordType::PoliticalAd).unwrap();
        assert_eq!(json, "\"political_ad\"");
        let parsed: RecordType = serde_json::from_str("\"political_matters\"").unwrap();
        assert_eq!(parsed, RecordType::PoliticalMatters);
    }

    #[test]
    fn test_record_type_display() {
        assert_eq!(RecordType::NonPolitical.to_string(), "non_political");
        assert_eq!(RecordType::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_first_facility_prefers_am_list() {
        let results = GlobalSearchResults {
            am_facility_list: Some(vec![Facility {
                call_sign: "WBLS".to_string(),
                service_code: "FM".to_string(),
                community_city: "NEW YORK".to_string(),
                community_state: "NY".to_string(),
            }]),
            fm_facility_list: Some(vec![Facility {
                call_sign: "OTHER".to_string(),
                service_code: "FM".to_string(),
                community_city: "ELSEWHERE".to_string(),
                community_state: "CA".to_string(),
            }]),
            tv_facility_list: None,
        };
        assert_eq!(results.first_facility().unwrap().call_sign, "WBLS");
    }

    #[test]
    fn test_first_facility_handles_null_lists() {
        let results = GlobalSearchResults::default();
        assert!(results.first_facility().is_none());
    }

    #[test]
    fn test_facility_search_response_deserialization() {
        let json = r#"{
            "results": {
                "globalSearchResults": {
                    "amFacilityList": null,
                    "fmFacilityList": [
                        {
                            "callSign": "KPWR",
                            "serviceCode": "FM",
                            "communityCity": "LOS ANGELES",
                            "communityState": "CA"
                        }
                    ],
                    "tvFacilityList": []
                }
            }
        }"#;

        let response: FacilitySearchResponse = serde_json::from_str(json).unwrap();
        let facility = response.results.global_search_results.first_facility().unwrap();
        assert_eq!(facility.call_sign, "KPWR");
        assert_eq!(facility.community_state, "CA");
    }

    #[test]
    fn test_standardized_record_flattens_tagged_fields() {
        let record = StandardizedRecord {
            record: TaggedRecord {
                id: "entry-1".to_string(),
                title: "Filing".to_string(),
                url: "https://example.com/file.pdf".to_string(),
                updated: "2024-10-30T12:00:00Z".to_string(),
                record_type: RecordType::PoliticalAd,
                facility_id: Some(19218),
                station: Some("KPWR".to_string()),
                year: Some(2024),
                office: Some("US Senate".to_string()),
                sponsor: Some("Harris for President".to_string()),
                file_path: Some("Political Files/2024/Federal/US Senate".to_string()),
                state: None,
                city: None,
                station_url: None,
            },
            sponsor_normalized: Some("Kamala Harris for President".to_string()),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"record_type\":\"political_ad\""));
        assert!(json.contains("\"sponsor_normalized\":\"Kamala Harris for President\""));
        // Flatten keeps the tagged fields at the top level.
        assert!(json.contains("\"id\":\"entry-1\""));
        assert!(!json.contains("\"record\":"));
    }

    #[test]
    fn test_minimal_record_projection() {
        let record = StandardizedRecord {
            record: TaggedRecord {
                id: "entry-2".to_string(),
                title: "Filing".to_string(),
                url: "https://example.com/file.pdf".to_string(),
                updated: "2024-06-01T00:00:00Z".to_string(),
                record_type: RecordType::PoliticalMatters,
                facility_id: None,
                station: Some("WVEE".to_string()),
                year: Some(2024),
                office: Some("Political Matters".to_string()),
                sponsor: Some("Issue Org".to_string()),
                file_path: None,
                state: Some("Georgia".to_string()),
                city: Some("Atlanta".to_string()),
                station_url: Some("https://publicfiles.fcc.gov/fm-profile/WVEE/rss".to_string()),
            },
            sponsor_normalized: Some("Issue Org".to_string()),
        };

        let minimal = MinimalRecord::from(&record);
        assert_eq!(minimal.station.as_deref(), Some("WVEE"));
        assert_eq!(minimal.year, Some(2024));

        let json = serde_json::to_string(&minimal).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("facility_id"));
    }

    #[test]
    fn test_station_row_csv_headers() {
        let row = StationRow {
            state: "New York".to_string(),
            city: "New York".to_string(),
            station: "WQHT/WBLS".to_string(),
            format: "Urban contemporary".to_string(),
        };

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&row).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(data.starts_with("State,City,Station,Format\n"));
    }

    #[test]
    fn test_status_row_csv_round_trip() {
        let csv_data = "State,City,Station,Format,City Match,State Match,FCC URL,HTTP Status Code\n\
                        Georgia,Atlanta,WVEE,Urban AC,Yes,Yes,https://publicfiles.fcc.gov/fm-profile/WVEE/rss,200\n";
        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let rows: Vec<StatusStationRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].station, "WVEE");
        assert_eq!(rows[0].http_status, "200");
    }
}
