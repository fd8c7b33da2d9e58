//! FCC public-files API client.
//!
//! This module resolves directory station names against the FCC facility
//! search endpoint, derives each station's public-file feed URL from its
//! service code and call sign, and probes those URLs for liveness.
//!
//! # Matching Strategy
//!
//! The search endpoint returns candidate facilities bucketed by service
//! (AM/FM/TV). The first candidate across all buckets is assumed to be the
//! relevant match; its community city and state are compared against the
//! directory row to flag mismatches for manual review rather than dropping
//! the row.

use crate::models::{
    CheckedStationRow, FacilitySearchResponse, GlobalSearchResults, StationRow, StatusStationRow,
};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use reqwest::Client;
use std::collections::HashMap;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};

/// Facility search endpoint; the query is appended as a path segment.
pub const FACILITY_SEARCH_URL: &str = "https://publicfiles.fcc.gov/api/service/facility/search";

/// Full state names mapped to their two-letter postal abbreviations.
static STATE_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Alabama", "AL"),
        ("Alaska", "AK"),
        ("Arizona", "AZ"),
        ("Arkansas", "AR"),
        ("California", "CA"),
        ("Colorado", "CO"),
        ("Connecticut", "CT"),
        ("Delaware", "DE"),
        ("Florida", "FL"),
        ("Georgia", "GA"),
        ("Hawaii", "HI"),
        ("Idaho", "ID"),
        ("Illinois", "IL"),
        ("Indiana", "IN"),
        ("Iowa", "IA"),
        ("Kansas", "KS"),
        ("Kentucky", "KY"),
        ("Louisiana", "LA"),
        ("Maine", "ME"),
        ("Maryland", "MD"),
        ("Massachusetts", "MA"),
        ("Michigan", "MI"),
        ("Minnesota", "MN"),
        ("Mississippi", "MS"),
        ("Missouri", "MO"),
        ("Montana", "MT"),
        ("Nebraska", "NE"),
        ("Nevada", "NV"),
        ("New Hampshire", "NH"),
        ("New Jersey", "NJ"),
        ("New Mexico", "NM"),
        ("New York", "NY"),
        ("North Carolina", "NC"),
        ("North Dakota", "ND"),
        ("Ohio", "OH"),
        ("Oklahoma", "OK"),
        ("Oregon", "OR"),
        ("Pennsylvania", "PA"),
        ("Rhode Island", "RI"),
        ("South Carolina", "SC"),
        ("South Dakota", "SD"),
        ("Tennessee", "TN"),
        ("Texas", "TX"),
        ("Utah", "UT"),
        ("Vermont", "VT"),
        ("Virginia", "VA"),
        ("Washington", "WA"),
        ("West Virginia", "WV"),
        ("Wisconsin", "WI"),
        ("Wyoming", "WY"),
    ])
});

/// Two-letter abbreviation for a full state name, or empty when unknown.
pub fn state_abbreviation(state: &str) -> &'static str {
    STATE_ABBREVIATIONS.get(state).copied().unwrap_or("")
}

/// Reduce a directory station name to a searchable call sign.
///
/// Simulcast pairs keep the part before the first `/`; band suffixes keep
/// the part before the first `-`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(search_query("WQHT/WBLS"), "WQHT");
/// assert_eq!(search_query("KPWR-FM"), "KPWR");
/// assert_eq!(search_query("WVEE"), "WVEE");
/// ```
pub fn search_query(station: &str) -> &str {
    if let Some((head, _)) = station.split_once('/') {
        head
    } else if let Some((head, _)) = station.split_once('-') {
        head
    } else {
        station
    }
}

/// Public-file feed URL for a facility.
///
/// Only AM and FM services carry the radio public-file profiles; other
/// service codes produce no URL. Call signs are uppercased and truncated
/// to 7 characters, the maximum the profile pages accept.
pub fn profile_url(service_code: &str, call_sign: &str) -> Option<String> {
    let profile = match service_code {
        "AM" => "am-profile",
        "FM" => "fm-profile",
        _ => return None,
    };
    let call: String = call_sign.to_uppercase().chars().take(7).collect();
    Some(format!("https://publicfiles.fcc.gov/{profile}/{call}/rss"))
}

/// Search the FCC API for a station name.
///
/// # Returns
///
/// The search result buckets, `Ok(None)` when the endpoint answers with a
/// non-success status (logged and treated as "no match"), or an error when
/// the request or decoding fails.
#[instrument(level = "info", skip(client))]
pub async fn search_station(
    client: &Client,
    station: &str,
) -> Result<Option<GlobalSearchResults>, Box<dyn Error>> {
    let query = search_query(station);
    let url = format!("{}/{}", FACILITY_SEARCH_URL, urlencoding::encode(query));

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        warn!(status = %response.status(), %station, "Facility search returned an error status");
        return Ok(None);
    }

    let body: FacilitySearchResponse = response.json().await?;
    Ok(Some(body.results.global_search_results))
}

/// Annotate station rows with FCC facility-match results.
///
/// Each row is looked up sequentially; failed lookups are logged and leave
/// the row unmatched rather than failing the batch.
#[instrument(level = "info", skip_all)]
pub async fn annotate_stations(client: &Client, rows: Vec<StationRow>) -> Vec<CheckedStationRow> {
    let checked: Vec<CheckedStationRow> = stream::iter(rows)
        .then(|row| {
            let client = client;
            async move { annotate_station(client, row).await }
        })
        .collect()
        .await;

    let matched = checked.iter().filter(|row| !row.fcc_url.is_empty()).count();
    info!(
        count = checked.len(),
        with_url = matched,
        "Annotated stations with facility matches"
    );
    checked
}

/// Annotate a single station row.
async fn annotate_station(client: &Client, row: StationRow) -> CheckedStationRow {
    let expected_city = row.city.trim().to_uppercase();
    let expected_state_abbr = state_abbreviation(row.state.trim());

    let mut city_match = "No";
    let mut state_match = "No";
    let mut fcc_url = String::new();

    match search_station(client, row.station.trim()).await {
        Ok(Some(results)) => {
            if let Some(facility) = results.first_facility() {
                if facility.community_city.to_uppercase() == expected_city {
                    city_match = "Yes";
                }
                if facility.community_state == expected_state_abbr {
                    state_match = "Yes";
                }
                fcc_url = profile_url(&facility.service_code, &facility.call_sign)
                    .unwrap_or_default();
                debug!(
                    station = %row.station,
                    call_sign = %facility.call_sign,
                    city_match,
                    state_match,
                    "Matched facility"
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, station = %row.station, "Facility search failed; leaving row unmatched");
        }
    }

    CheckedStationRow {
        state: row.state,
        city: row.city,
        station: row.station,
        format: row.format,
        city_match: city_match.to_string(),
        state_match: state_match.to_string(),
        fcc_url,
    }
}

/// Probe each row's public-file feed URL and record the HTTP status.
///
/// Rows without a URL get `"N/A"`; failed requests are logged and leave
/// the status empty.
#[instrument(level = "info", skip_all)]
pub async fn check_station_urls(
    client: &Client,
    rows: Vec<CheckedStationRow>,
) -> Vec<StatusStationRow> {
    let checked: Vec<StatusStationRow> = stream::iter(rows)
        .then(|row| {
            let client = client;
            async move {
                let http_status = if row.fcc_url.is_empty() {
                    "N/A".to_string()
                } else {
                    match client.get(&row.fcc_url).send().await {
                        Ok(response) => response.status().as_u16().to_string(),
                        Err(e) => {
                            error!(error = %e, url = %row.fcc_url, "URL check failed");
                            String::new()
                        }
                    }
                };
                StatusStationRow {
                    state: row.state,
                    city: row.city,
                    station: row.station,
                    format: row.format,
                    city_match: row.city_match,
                    state_match: row.state_match,
                    fcc_url: row.fcc_url,
                    http_status,
                }
            }
        })
        .collect()
        .await;

    let live = checked.iter().filter(|row| row.http_status == "200").count();
    info!(count = checked.len(), live, "Checked public-file feed URLs");
    checked
}
