//! Public-file feed ingestion.
//!
//! Each station's public-file page exposes a feed of filing uploads. The
//! FCC serves both RSS (`<item>`, `pubDate`, `guid`) and Atom (`<entry>`,
//! `updated`, `id`) shapes, so the parser accepts either. Entry titles
//! embed everything interesting: the uploading entity, the upload date,
//! and the file path, shaped like
//!
//! ```text
//! A new political file was uploaded for KVEG(FM) Entity 19218 on
//! 10/30/2024 in Political Files/2024/Federal/US Senate/Jane Doe
//! ```
//!
//! Ingestion pulls a best-effort sponsor, facility id, and office out of
//! the title; the tagging stage later re-derives office and sponsor with
//! the full classification rules.

use crate::classify::file_path_from_title;
use crate::models::{AdEntry, StatusStationRow};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};

/// Program-log uploads share the feed but are not advertising disclosures.
const SKIPPED_TITLE_MARKER: &str = "Issues and Programs Lists";

/// Accumulator for the fields of one feed entry.
#[derive(Debug, Default)]
struct RawEntry {
    title: String,
    link: String,
    id: String,
    updated: String,
}

/// Parse a public-file feed into ad entries.
///
/// Accepts RSS and Atom shapes. Entries whose title marks them as
/// issues-and-programs lists are skipped.
///
/// # Arguments
///
/// * `xml` - The feed document
/// * `station_url` - The feed URL, recorded on every entry
/// * `state`, `city` - Location columns carried over from the station roster
pub fn parse_feed(
    xml: &str,
    station_url: &str,
    state: Option<&str>,
    city: Option<&str>,
) -> Result<Vec<AdEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut raw = RawEntry::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" || name == "entry" {
                    in_entry = true;
                    raw = RawEntry::default();
                } else if in_entry && name == "link" {
                    // Atom carries the target in an href attribute.
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"href" {
                            raw.link = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                if in_entry && e.name().as_ref() == b"link" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"href" {
                            raw.link = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if in_entry && (name == "item" || name == "entry") {
                    in_entry = false;
                    if let Some(entry) = build_entry(&raw, station_url, state, city) {
                        entries.push(entry);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let decoded = e.decode().unwrap_or_default();
                    let text = quick_xml::escape::unescape(&decoded)
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| decoded.into_owned());
                    assign_field(&mut raw, &current_tag, text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&mut raw, &current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Box::new(e)),
            _ => {}
        }
    }

    Ok(entries)
}

fn assign_field(raw: &mut RawEntry, tag: &str, text: String) {
    match tag {
        "title" => raw.title = text,
        // RSS puts the link in element text; don't clobber an Atom href.
        "link" if raw.link.is_empty() => raw.link = text,
        "id" | "guid" => raw.id = text,
        "updated" => raw.updated = text,
        "pubDate" | "published" if raw.updated.is_empty() => raw.updated = text,
        _ => {}
    }
}

fn build_entry(
    raw: &RawEntry,
    station_url: &str,
    state: Option<&str>,
    city: Option<&str>,
) -> Option<AdEntry> {
    if raw.title.is_empty() && raw.id.is_empty() {
        return None;
    }
    if raw.title.contains(SKIPPED_TITLE_MARKER) {
        debug!(title = %truncate_for_log(&raw.title, 120), "Skipping issues-and-programs entry");
        return None;
    }

    Some(AdEntry {
        sponsor: Some(sponsor_from_title(&raw.title)),
        facility_id: facility_id_from_title(&raw.title),
        office: office_from_title(&raw.title),
        title: raw.title.clone(),
        url: raw.link.clone(),
        id: raw.id.clone(),
        updated: raw.updated.clone(),
        station_url: station_url.to_string(),
        state: state.map(str::to_string),
        city: city.map(str::to_string),
    })
}

/// Sponsor guess: the text after the last `/` of the title.
///
/// Titles end with the deepest directory of the upload path, which for
/// political filings is the sponsoring committee.
pub fn sponsor_from_title(title: &str) -> String {
    title.rsplit('/').next().unwrap_or(title).to_string()
}

/// Facility id: the integer token following `"Entity "` in the title.
pub fn facility_id_from_title(title: &str) -> Option<i64> {
    let (_, rest) = title.split_once("Entity ")?;
    rest.split(' ').next().and_then(|token| token.parse().ok())
}

/// Office guess: the second-to-last path segment of the upload path.
pub fn office_from_title(title: &str) -> Option<String> {
    let path = file_path_from_title(title)?;
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() >= 2 {
        Some(segments[segments.len() - 2].to_string())
    } else {
        None
    }
}

/// Fetch and parse every station feed in the roster.
///
/// Rows without a public-file URL are skipped; fetch and parse failures
/// are logged and skip the station without failing the batch.
#[instrument(level = "info", skip_all)]
pub async fn collect_entries(client: &Client, rows: Vec<StatusStationRow>) -> Vec<AdEntry> {
    let entries: Vec<AdEntry> = stream::iter(rows)
        .then(|row| {
            let client = client;
            async move {
                if row.fcc_url.is_empty() {
                    debug!(station = %row.station, "No public-file URL; skipping");
                    return Vec::new();
                }
                match fetch_feed(client, &row).await {
                    Ok(batch) => {
                        debug!(count = batch.len(), url = %row.fcc_url, "Parsed feed");
                        batch
                    }
                    Err(e) => {
                        error!(error = %e, url = %row.fcc_url, "Feed fetch failed; skipping station");
                        Vec::new()
                    }
                }
            }
        })
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flatten()
        .collect();

    info!(count = entries.len(), "Collected feed entries");
    entries
}

/// Fetch one station's feed and parse it.
#[instrument(level = "info", skip_all, fields(url = %row.fcc_url))]
async fn fetch_feed(client: &Client, row: &StatusStationRow) -> Result<Vec<AdEntry>, Box<dyn Error>> {
    let xml = client
        .get(&row.fcc_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let state = (!row.state.is_empty()).then_some(row.state.as_str());
    let city = (!row.city.is_empty()).then_some(row.city.as_str());

    match parse_feed(&xml, &row.fcc_url, state, city) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(
                error = %e,
                preview = %truncate_for_log(&xml, 200),
                "Feed XML failed to parse"
            );
            Err(e)
        }
    }
}

/// Merge freshly fetched entries into previously collected ones.
///
/// Deduplicates by entry id; existing records win, so repeated runs only
/// append entries the file has not seen yet.
pub fn merge_entries(existing: Vec<AdEntry>, fetched: Vec<AdEntry>) -> Vec<AdEntry> {
    existing
        .into_iter()
        .chain(fetched)
        .unique_by(|entry| entry.id.clone())
        .collect()
}
