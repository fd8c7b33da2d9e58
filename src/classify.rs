//! Record classification and tagging.
//!
//! Every public-file feed entry carries its upload path inside the title,
//! shaped like `"... in <file path> on <date>"`. This module parses that
//! path and classifies each record as a political ad, a political-matters
//! disclosure, or a non-political filing, then extracts the office and
//! sponsor from the path segments.
//!
//! # Path Layouts
//!
//! Political files nest as
//! `Political Files/<year>/<category>/<office>/<sponsor>` with most levels
//! optional, where `<category>` is one of Federal/State/Local/Non-Candidate
//! Issue Ads and federal offices are US House/US Senate/President. The
//! political-matters tree is flatter: an optional year followed by the
//! sponsoring organization.

use crate::models::{
    AdEntry, CategoryGroup, NonPoliticalAnalysis, NonPoliticalSummary, RecordType, TaggedRecord,
};
use crate::utils::parse_updated;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

/// Path prefix of candidate-advertising filings.
pub const POLITICAL_FILES_PREFIX: &str = "Political Files/";

/// Path prefix of issue-advertising disclosures.
pub const POLITICAL_MATTERS_PREFIX: &str =
    "Political Matters and Controversial Issues Disclosures";

/// Path segments that denote a race category rather than a sponsor.
const CATEGORY_VALUES: [&str; 4] = ["Federal", "State", "Local", "Non-Candidate Issue Ads"];

/// Path segments that denote a federal office.
const FEDERAL_OFFICES: [&str; 3] = ["US House", "US Senate", "President"];

/// Call sign embedded in a public-file profile URL or entry id.
static PROFILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(am|fm)-profile/([A-Z0-9-]+)/").unwrap());

/// Four-digit filing year anywhere in a path.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[12][0-9])\b").unwrap());

/// Result of classifying one entry title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub record_type: RecordType,
    pub file_path: Option<String>,
    pub office: Option<String>,
    pub sponsor: Option<String>,
}

impl Classification {
    fn unknown() -> Self {
        Classification {
            record_type: RecordType::Unknown,
            file_path: None,
            office: None,
            sponsor: None,
        }
    }
}

/// Extract the upload path from an entry title.
///
/// The path is the text between the first `" in "` and the first
/// subsequent `" on "`; titles without `" in "` yield `None`.
pub fn file_path_from_title(title: &str) -> Option<String> {
    let after_in = title.split(" in ").nth(1)?;
    let path = after_in.split(" on ").next().unwrap_or(after_in);
    Some(path.to_string())
}

/// Classify an entry title by its upload path.
pub fn categorize(title: &str) -> Classification {
    let Some(path) = file_path_from_title(title) else {
        return Classification::unknown();
    };

    if path.starts_with(POLITICAL_MATTERS_PREFIX) {
        return categorize_political_matters(path);
    }

    if let Some(remainder) = path.strip_prefix(POLITICAL_FILES_PREFIX) {
        let (office, sponsor) = parse_political_files_segments(remainder);
        return Classification {
            record_type: RecordType::PoliticalAd,
            file_path: Some(path),
            office,
            sponsor,
        };
    }

    Classification {
        record_type: RecordType::NonPolitical,
        file_path: Some(path),
        office: None,
        sponsor: None,
    }
}

fn categorize_political_matters(path: String) -> Classification {
    let remainder = path
        .strip_prefix(POLITICAL_MATTERS_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(&path);

    let mut segments: Vec<&str> = remainder.split('/').filter(|s| !s.is_empty()).collect();
    if segments.first().is_some_and(|s| is_year_segment(s)) {
        segments.remove(0);
    }

    // The deepest remaining directory names the sponsoring organization.
    let sponsor = segments.last().map(|s| s.to_string());

    Classification {
        record_type: RecordType::PoliticalMatters,
        file_path: Some(path),
        office: Some("Political Matters".to_string()),
        sponsor,
    }
}

/// Derive office and sponsor from the segments below `Political Files/`.
fn parse_political_files_segments(remainder: &str) -> (Option<String>, Option<String>) {
    let mut segments: Vec<&str> = remainder.split('/').collect();
    if segments.first().is_some_and(|s| is_year_segment(s)) {
        segments.remove(0);
    }
    // A trailing slash leaves one empty segment; treat it as no segments.
    if segments == [""] {
        segments.clear();
    }

    let is_category = |s: &str| CATEGORY_VALUES.contains(&s);
    let is_federal = |s: &str| FEDERAL_OFFICES.contains(&s);

    match segments.len() {
        0 => (None, None),
        // Office or category only, no sponsor yet.
        1 => (segment(segments[0]), None),
        2 => {
            let (first, second) = (segments[0], segments[1]);
            if is_category(first) {
                if is_federal(second) || is_category(second) {
                    // Both segments are categories ("Federal/US House").
                    (segment(second), None)
                } else {
                    // Category then sponsor ("Local/Candidate Name").
                    (segment(first), segment(second))
                }
            } else {
                (segment(first), segment(second))
            }
        }
        _ => {
            if is_category(segments[0]) {
                // "Federal/US Senate/Candidate Name"
                (segment(segments[1]), segment(segments[2]))
            } else {
                (
                    segment(segments[segments.len() - 2]),
                    segment(segments[segments.len() - 1]),
                )
            }
        }
    }
}

fn segment(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn is_year_segment(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_digit())
}

/// Recover a station call sign from an entry id or URL.
///
/// The id is tried first since it reliably embeds the profile path.
pub fn extract_station(url: Option<&str>, entry_id: Option<&str>) -> Option<String> {
    for candidate in [entry_id, url].into_iter().flatten() {
        if let Some(caps) = PROFILE_RE.captures(candidate) {
            return Some(caps[2].to_string());
        }
    }
    None
}

/// First plausible filing year in a file path.
pub fn extract_year(path: &str) -> Option<i32> {
    YEAR_RE
        .captures(path)
        .and_then(|caps| caps[1].parse().ok())
}

/// Counters accumulated while tagging a batch of records.
#[derive(Debug, Default)]
pub struct TagStats {
    pub political_ad: usize,
    pub political_matters: usize,
    pub non_political: usize,
    pub unknown: usize,
    pub station_extracted: usize,
    pub year_extracted: usize,
    pub earliest_updated: Option<DateTime<FixedOffset>>,
    pub latest_updated: Option<DateTime<FixedOffset>>,
}

impl TagStats {
    fn bump(&mut self, record_type: RecordType) {
        match record_type {
            RecordType::PoliticalAd => self.political_ad += 1,
            RecordType::PoliticalMatters => self.political_matters += 1,
            RecordType::NonPolitical => self.non_political += 1,
            RecordType::Unknown => self.unknown += 1,
        }
    }

    fn observe_updated(&mut self, ts: DateTime<FixedOffset>) {
        if self.earliest_updated.is_none_or(|cur| ts < cur) {
            self.earliest_updated = Some(ts);
        }
        if self.latest_updated.is_none_or(|cur| ts > cur) {
            self.latest_updated = Some(ts);
        }
    }

    pub fn total(&self) -> usize {
        self.political_ad + self.political_matters + self.non_political + self.unknown
    }
}

/// Tag a batch of raw feed entries.
///
/// Classifies each record, recovers the station call sign and filing year,
/// and settles office/sponsor: political-ad records take the freshly
/// parsed values outright (the path layout is authoritative there), while
/// other types keep the ingest-time values unless the parse produced
/// something better.
#[instrument(level = "info", skip_all)]
pub fn tag_records(entries: Vec<AdEntry>) -> (Vec<TaggedRecord>, TagStats) {
    let mut stats = TagStats::default();
    let mut tagged = Vec::with_capacity(entries.len());

    for entry in entries {
        let classification = categorize(&entry.title);
        stats.bump(classification.record_type);

        let station = extract_station(Some(&entry.url), Some(&entry.id));
        if station.is_some() {
            stats.station_extracted += 1;
        }

        let year = classification.file_path.as_deref().and_then(extract_year);
        if year.is_some() {
            stats.year_extracted += 1;
        }

        if let Some(ts) = parse_updated(&entry.updated) {
            stats.observe_updated(ts);
        }

        let (office, sponsor) = if classification.record_type == RecordType::PoliticalAd {
            (classification.office, classification.sponsor)
        } else {
            (
                classification.office.or(entry.office),
                classification.sponsor.or(entry.sponsor),
            )
        };

        tagged.push(TaggedRecord {
            id: entry.id,
            title: entry.title,
            url: entry.url,
            updated: entry.updated,
            record_type: classification.record_type,
            facility_id: entry.facility_id,
            station,
            year,
            office,
            sponsor,
            file_path: classification.file_path,
            state: entry.state,
            city: entry.city,
            station_url: (!entry.station_url.is_empty()).then_some(entry.station_url),
        });
    }

    info!(
        total = stats.total(),
        political_ad = stats.political_ad,
        political_matters = stats.political_matters,
        non_political = stats.non_political,
        unknown = stats.unknown,
        "Tagged records"
    );
    (tagged, stats)
}

/// Group raw entries that fall outside `Political Files/` by their
/// top-level path segment.
#[instrument(level = "info", skip_all)]
pub fn group_non_political(entries: &[AdEntry]) -> NonPoliticalAnalysis {
    let mut political_files = 0usize;
    let mut malformed: Vec<AdEntry> = Vec::new();
    let mut by_category: Vec<(String, Vec<AdEntry>)> = Vec::new();

    for entry in entries {
        match file_path_from_title(&entry.title) {
            Some(path) if path.starts_with(POLITICAL_FILES_PREFIX) => political_files += 1,
            Some(path) => {
                let category = path.split('/').next().unwrap_or("").to_string();
                match by_category.iter_mut().find(|(name, _)| *name == category) {
                    Some((_, records)) => records.push(entry.clone()),
                    None => by_category.push((category, vec![entry.clone()])),
                }
            }
            None => malformed.push(entry.clone()),
        }
    }

    let non_political_files = by_category.iter().map(|(_, records)| records.len()).sum();
    let mut categories: Vec<CategoryGroup> = by_category
        .into_iter()
        .map(|(category, records)| CategoryGroup {
            count: records.len(),
            category,
            records,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    let malformed_count = malformed.len();
    if !malformed.is_empty() {
        categories.push(CategoryGroup {
            category: "Malformed Titles".to_string(),
            count: malformed_count,
            records: malformed,
        });
    }

    info!(
        total = entries.len(),
        political_files,
        non_political_files,
        malformed = malformed_count,
        "Grouped non-political records"
    );

    NonPoliticalAnalysis {
        summary: NonPoliticalSummary {
            total_records: entries.len(),
            political_files,
            non_political_files,
            malformed: malformed_count,
        },
        categories,
    }
}
