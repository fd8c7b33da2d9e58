//! Sponsor-name normalization.
//!
//! Sponsor names in political filings are typed by station staff, so the
//! same committee shows up under dozens of spellings: capitalization
//! drift, invoice numbers glued to the end, separator variations
//! ("Harris D President", "Harris-D-President"), and short forms of
//! candidate names. Normalization runs in three passes:
//!
//! 1. **Cleaning**: strip trailing invoice/order numbers, dates, and the
//!    "Premier Network" prefix, then collapse whitespace
//! 2. **Canonical matching**: anchored lowercase patterns map known
//!    committee variations to one canonical name
//! 3. **Recapitalization**: title-case the rest, keeping acronyms
//!    uppercase and function words lowercase
//!
//! The canonical table ships with entries for the recent presidential
//! committees and can be replaced wholesale from a YAML file.

use crate::models::{RecordType, StandardizedRecord, TaggedRecord};
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use tracing::{info, instrument};

/// Acronyms kept uppercase during recapitalization.
static ACRONYMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "PAC", "INC", "LLC", "USA", "US", "MAGA", "NAACP", "DNC", "RNC", "GOP", "FEC", "EEO",
        "NC", "DC", "LA", "NY", "CA", "TX", "FL", "VA", "MD", "GA", "MI", "OH", "PA", "AZ", "NV",
        "WI", "MN", "CO", "OR", "WA", "MA", "NJ", "CT", "IL", "TN", "SC", "ACTUM", "YES", "NO",
        "PROP", "DA", "CEO", "CFO", "VP", "AG", "HD", "FM", "AM", "TV", "WLLD", "KLCA", "FF",
        "AI", "IT", "II", "III",
    ])
});

/// Function words lowercased when not leading the name.
static LOWERCASE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "for", "of", "the", "and", "or", "in", "on", "at", "to", "a", "an", "as", "but", "by",
        "nor", "so", "yet", "vs", "v",
    ])
});

/// Trailing invoice/order numbers (5+ digits with digit/dash runs).
static TRAILING_INVOICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d{5,}[\s\-\d]*$").unwrap());
/// Trailing dates like `10-30-24` or `1/2/2024`.
static TRAILING_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\d{1,2}[-/]\d{1,2}[-/]\d{2,4}$").unwrap());
/// Trailing date-like digit blocks (MMDDYYYY and friends).
static TRAILING_DATELIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d{6,8}$").unwrap());
/// Trailing " - 123456..." order references.
static TRAILING_ORDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s+\d+.*$").unwrap());
/// Leading radio-network prefix; the network is not the sponsor.
static PREMIER_NETWORK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^premier\s+network\s+").unwrap());

/// "For President" and similar office phrases keep a lowercase "for".
static FOR_OFFICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bFor (President|Senate|Congress|Governor|Mayor|Council)\b").unwrap());
static OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bOf\b").unwrap());
static THE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bThe\b").unwrap());

/// One canonical committee name and the patterns that map to it.
///
/// Patterns are matched against the cleaned, lowercased sponsor and should
/// anchor with `^` to avoid matching inside longer names.
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalEntry {
    pub canonical: String,
    pub patterns: Vec<String>,
}

/// Compiled canonical-name table.
pub struct CanonicalMatcher {
    entries: Vec<(String, Vec<Regex>)>,
}

impl CanonicalMatcher {
    /// Compile a table of canonical entries.
    ///
    /// # Errors
    ///
    /// Returns an error when any pattern fails to compile.
    pub fn from_entries(entries: &[CanonicalEntry]) -> Result<Self, Box<dyn Error>> {
        let mut compiled = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut patterns = Vec::with_capacity(entry.patterns.len());
            for pattern in &entry.patterns {
                patterns.push(Regex::new(pattern)?);
            }
            compiled.push((entry.canonical.clone(), patterns));
        }
        Ok(CanonicalMatcher { entries: compiled })
    }

    /// The built-in table: presidential committees from the 2020-2024 cycles.
    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 4] = [
            (
                "Kamala Harris for President",
                &[
                    r"^kamala\s+harris\s+for\s+president",
                    r"^harris\s+for\s+president",
                    r"^kamala\s+harris\s+d\s+president",
                    r"^harris\s+d\s+president",
                    r"^harris-d-president",
                    r"^kamala\s+harris$",
                ],
            ),
            (
                "Joe Biden for President",
                &[
                    r"^joe\s+biden\s+for\s+president",
                    r"^biden\s+for\s+president",
                    r"^joseph\s+biden\s+for\s+president",
                    r"^joe\s+biden$",
                    r"^joseph\s+biden$",
                    r"^biden$",
                ],
            ),
            (
                "Donald Trump for President",
                &[
                    r"^donald\s+trump\s+for\s+president",
                    r"^donald\s+j\.?\s+trump\s+for\s+president",
                    r"^trump\s+for\s+president",
                    r"^donald\s+trump$",
                    r"^donald\s+j\.?\s+trump$",
                ],
            ),
            (
                "Bernie Sanders for President",
                &[
                    r"^bernie\s+sanders\s+for\s+president",
                    r"^sanders\s+for\s+president",
                    r"^bernie\s+sanders$",
                ],
            ),
        ];

        let entries = table
            .into_iter()
            .map(|(canonical, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(p).unwrap())
                    .collect::<Vec<_>>();
                (canonical.to_string(), compiled)
            })
            .collect();
        CanonicalMatcher { entries }
    }

    /// Canonical name for a sponsor, if any pattern matches.
    pub fn lookup(&self, sponsor: &str) -> Option<&str> {
        let lowered = sponsor.to_lowercase();
        let lowered = lowered.trim();
        for (canonical, patterns) in &self.entries {
            if patterns.iter().any(|pattern| pattern.is_match(lowered)) {
                return Some(canonical);
            }
        }
        None
    }
}

/// Load and compile a canonical-name table from a YAML file.
///
/// The file is a list of `{canonical, patterns}` entries and replaces the
/// built-in table entirely.
pub fn load_canonical_matcher(path: &str) -> Result<CanonicalMatcher, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<CanonicalEntry> = serde_yaml::from_str(&raw)?;
    info!(count = entries.len(), %path, "Loaded canonical sponsor table");
    CanonicalMatcher::from_entries(&entries)
}

/// Strip invoice numbers, dates, and network prefixes from a sponsor name.
pub fn clean_sponsor_name(sponsor: &str) -> String {
    let cleaned = TRAILING_INVOICE_RE.replace(sponsor, "");
    let cleaned = TRAILING_DATE_RE.replace(&cleaned, "");
    let cleaned = TRAILING_DATELIKE_RE.replace(&cleaned, "");
    let cleaned = TRAILING_ORDER_RE.replace(&cleaned, "");
    let cleaned = PREMIER_NETWORK_RE.replace(&cleaned, "");
    collapse_whitespace(&cleaned)
}

/// Recapitalize a sponsor name word by word.
///
/// Acronyms stay uppercase, function words after the first position stay
/// lowercase, and everything else is title-cased, followed by fix-ups for
/// office phrases and corporate suffixes.
pub fn standardize_basic(sponsor: &str) -> Option<String> {
    if sponsor.trim().is_empty() {
        return None;
    }

    let mut words = Vec::new();
    for (i, word) in sponsor.split_whitespace().enumerate() {
        let stripped = word
            .trim_matches(|c| ".,!?;:".contains(c))
            .to_uppercase();

        if ACRONYMS.contains(stripped.as_str()) {
            words.push(stripped);
        } else if i > 0 && LOWERCASE_WORDS.contains(word.to_lowercase().as_str()) {
            words.push(word.to_lowercase());
        } else {
            words.push(title_case(word));
        }
    }

    let result = words.join(" ");
    let result = FOR_OFFICE_RE.replace_all(&result, "for $1");
    let result = OF_RE.replace_all(&result, "of");
    let result = THE_RE.replace_all(&result, |caps: &Captures| {
        // Leading "The" stays capitalized ("The Lincoln Project").
        if caps.get(0).map_or(0, |m| m.start()) == 0 {
            "The".to_string()
        } else {
            "the".to_string()
        }
    });
    let result = result
        .replace(" Pac", " PAC")
        .replace(" Inc", " INC")
        .replace(" Llc", " LLC");

    Some(result)
}

/// Full normalization: clean, canonical match, then recapitalize.
pub fn standardize_advanced(sponsor: &str, canon: &CanonicalMatcher) -> Option<String> {
    let cleaned = clean_sponsor_name(sponsor);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(canonical) = canon.lookup(&cleaned) {
        return Some(canonical.to_string());
    }

    standardize_basic(&cleaned)
}

/// Title-case one word: uppercase the first letter of each alphabetic run,
/// lowercase the rest ("o'brien" -> "O'Brien").
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Counts describing a sponsor mapping.
#[derive(Debug, Clone, Copy)]
pub struct MappingStats {
    pub original_count: usize,
    pub standardized_count: usize,
    pub merged_count: usize,
}

impl MappingStats {
    pub fn reduction_percent(&self) -> f64 {
        if self.original_count == 0 {
            0.0
        } else {
            self.merged_count as f64 / self.original_count as f64 * 100.0
        }
    }
}

/// All original spellings that collapsed into one standardized name.
#[derive(Debug, Clone)]
pub struct VariationGroup {
    pub standardized: String,
    /// `(original spelling, record count)` pairs.
    pub variations: Vec<(String, usize)>,
    pub total: usize,
}

fn is_political(record: &TaggedRecord) -> bool {
    matches!(
        record.record_type,
        RecordType::PoliticalAd | RecordType::PoliticalMatters
    )
}

/// Records whose sponsor field actually names a sponsor.
///
/// Drops records where the feed parse left an entity reference in the
/// sponsor or where the sponsor merely repeats the office segment.
fn has_usable_sponsor(record: &TaggedRecord) -> bool {
    record
        .sponsor
        .as_deref()
        .is_some_and(|sponsor| !sponsor.contains("Entity"))
        && record.sponsor != record.office
}

/// Build the original-to-standardized sponsor mapping over political records.
///
/// # Returns
///
/// The mapping (sorted by original spelling), the variation groups sorted
/// by descending record count, and the merge statistics.
#[instrument(level = "info", skip_all)]
pub fn build_mapping(
    records: &[TaggedRecord],
    canon: &CanonicalMatcher,
) -> (BTreeMap<String, String>, Vec<VariationGroup>, MappingStats) {
    let political: Vec<&TaggedRecord> = records
        .iter()
        .filter(|record| is_political(record) && has_usable_sponsor(record))
        .collect();

    let mut mapping: BTreeMap<String, String> = BTreeMap::new();
    for record in &political {
        let Some(original) = record.sponsor.as_deref() else {
            continue;
        };
        if !mapping.contains_key(original) {
            if let Some(standardized) = standardize_advanced(original, canon) {
                mapping.insert(original.to_string(), standardized);
            }
        }
    }

    let original_count = mapping.len();
    let standardized_count = mapping.values().collect::<HashSet<_>>().len();
    let stats = MappingStats {
        original_count,
        standardized_count,
        merged_count: original_count - standardized_count,
    };

    let mut sponsor_counts: HashMap<&str, usize> = HashMap::new();
    for record in &political {
        if let Some(sponsor) = record.sponsor.as_deref() {
            *sponsor_counts.entry(sponsor).or_default() += 1;
        }
    }

    let mut reverse: HashMap<&str, Vec<(String, usize)>> = HashMap::new();
    for (original, standardized) in &mapping {
        reverse.entry(standardized).or_default().push((
            original.clone(),
            sponsor_counts.get(original.as_str()).copied().unwrap_or(0),
        ));
    }

    let mut groups: Vec<VariationGroup> = reverse
        .into_iter()
        .filter(|(_, originals)| originals.len() > 1)
        .map(|(standardized, variations)| {
            let total = variations.iter().map(|(_, count)| count).sum();
            VariationGroup {
                standardized: standardized.to_string(),
                variations,
                total,
            }
        })
        .collect();
    groups.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.standardized.cmp(&b.standardized))
    });

    info!(
        original = stats.original_count,
        standardized = stats.standardized_count,
        merged = stats.merged_count,
        groups = groups.len(),
        "Built sponsor mapping"
    );
    (mapping, groups, stats)
}

/// Attach a `sponsor_normalized` value to every record.
///
/// Mapped sponsors take the mapped value; unmapped sponsors (non-political
/// records, mostly) fall back to basic recapitalization of the raw name.
pub fn apply_mapping(
    records: Vec<TaggedRecord>,
    mapping: &BTreeMap<String, String>,
) -> Vec<StandardizedRecord> {
    records
        .into_iter()
        .map(|record| {
            let sponsor_normalized = match record.sponsor.as_deref() {
                Some(sponsor) => match mapping.get(sponsor) {
                    Some(mapped) => Some(mapped.clone()),
                    None => {
                        Some(standardize_basic(sponsor).unwrap_or_else(|| sponsor.to_string()))
                    }
                },
                None => None,
            };
            StandardizedRecord {
                record,
                sponsor_normalized,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_invoice_numbers() {
        assert_eq!(
            clean_sponsor_name("Harris for President 1234567"),
            "Harris for President"
        );
        assert_eq!(
            clean_sponsor_name("Harris for President 12345 678 9"),
            "Harris for President"
        );
    }

    #[test]
    fn test_clean_strips_trailing_dates() {
        assert_eq!(
            clean_sponsor_name("Committee Name 10/30/2024"),
            "Committee Name"
        );
        assert_eq!(clean_sponsor_name("Committee Name 1-2-24"), "Committee Name");
    }

    #[test]
    fn test_clean_strips_order_references() {
        assert_eq!(
            clean_sponsor_name("Committee Name - 123456 rev 2"),
            "Committee Name"
        );
    }

    #[test]
    fn test_clean_strips_premier_network_prefix() {
        assert_eq!(
            clean_sponsor_name("Premier Network Harris for President"),
            "Harris for President"
        );
        assert_eq!(
            clean_sponsor_name("PREMIER NETWORK Biden for President"),
            "Biden for President"
        );
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_sponsor_name("  Some   Committee  "), "Some Committee");
    }

    #[test]
    fn test_clean_keeps_short_numbers() {
        // Proposition numbers and districts are not invoice noise.
        assert_eq!(clean_sponsor_name("Yes on Prop 27"), "Yes on Prop 27");
    }

    #[test]
    fn test_canonical_lookup_harris_variations() {
        let canon = CanonicalMatcher::builtin();
        for variation in [
            "Kamala Harris for President",
            "HARRIS FOR PRESIDENT",
            "harris d president",
            "Harris-D-President",
            "Kamala Harris",
        ] {
            assert_eq!(
                canon.lookup(variation),
                Some("Kamala Harris for President"),
                "variation: {variation}"
            );
        }
    }

    #[test]
    fn test_canonical_lookup_is_anchored() {
        let canon = CanonicalMatcher::builtin();
        assert!(canon.lookup("Friends of Kamala Harris").is_none());
        assert!(canon.lookup("Unrelated Committee").is_none());
    }

    #[test]
    fn test_canonical_lookup_trump_with_middle_initial() {
        let canon = CanonicalMatcher::builtin();
        assert_eq!(
            canon.lookup("Donald J. Trump for President 2024"),
            Some("Donald Trump for President")
        );
    }

    #[test]
    fn test_canonical_from_entries_rejects_bad_pattern() {
        let entries = vec![CanonicalEntry {
            canonical: "Broken".to_string(),
            patterns: vec!["(unclosed".to_string()],
        }];
        assert!(CanonicalMatcher::from_entries(&entries).is_err());
    }

    #[test]
    fn test_standardize_basic_recapitalizes() {
        assert_eq!(
            standardize_basic("CITIZENS FOR A BETTER TOMORROW").as_deref(),
            Some("Citizens for a Better Tomorrow")
        );
    }

    #[test]
    fn test_standardize_basic_keeps_acronyms() {
        assert_eq!(
            standardize_basic("naacp voter fund pac").as_deref(),
            Some("NAACP Voter Fund PAC")
        );
        assert_eq!(
            standardize_basic("friends of dc statehood").as_deref(),
            Some("Friends of DC Statehood")
        );
    }

    #[test]
    fn test_standardize_basic_office_phrase() {
        assert_eq!(
            standardize_basic("JANE DOE FOR SENATE").as_deref(),
            Some("Jane Doe for Senate")
        );
    }

    #[test]
    fn test_standardize_basic_corporate_suffixes() {
        assert_eq!(
            standardize_basic("acme media llc").as_deref(),
            Some("Acme Media LLC")
        );
    }

    #[test]
    fn test_standardize_basic_leading_the_stays_capitalized() {
        assert_eq!(
            standardize_basic("the lincoln project").as_deref(),
            Some("The Lincoln Project")
        );
    }

    #[test]
    fn test_standardize_basic_empty() {
        assert!(standardize_basic("").is_none());
        assert!(standardize_basic("   ").is_none());
    }

    #[test]
    fn test_standardize_advanced_pipeline() {
        let canon = CanonicalMatcher::builtin();
        // Cleaning happens before canonical matching, so the invoice
        // number does not block the match.
        assert_eq!(
            standardize_advanced("HARRIS FOR PRESIDENT 8675309", &canon).as_deref(),
            Some("Kamala Harris for President")
        );
        assert_eq!(
            standardize_advanced("some local committee", &canon).as_deref(),
            Some("Some Local Committee")
        );
        assert!(standardize_advanced("  12345678  ", &canon).is_none());
    }

    fn political_record(sponsor: &str) -> TaggedRecord {
        TaggedRecord {
            id: format!("id-{sponsor}"),
            title: "t".to_string(),
            url: "u".to_string(),
            updated: "2024-01-01T00:00:00Z".to_string(),
            record_type: RecordType::PoliticalAd,
            facility_id: None,
            station: None,
            year: Some(2024),
            office: Some("President".to_string()),
            sponsor: Some(sponsor.to_string()),
            file_path: None,
            state: None,
            city: None,
            station_url: None,
        }
    }

    #[test]
    fn test_build_mapping_merges_variations() {
        let canon = CanonicalMatcher::builtin();
        let records = vec![
            political_record("HARRIS FOR PRESIDENT"),
            political_record("Harris for President"),
            political_record("Harris for President"),
            political_record("Kamala Harris"),
            political_record("Unrelated Committee"),
        ];

        let (mapping, groups, stats) = build_mapping(&records, &canon);

        assert_eq!(stats.original_count, 4);
        // Three spellings collapse into the canonical name.
        assert_eq!(stats.standardized_count, 2);
        assert_eq!(stats.merged_count, 2);

        assert_eq!(
            mapping.get("Kamala Harris").map(String::as_str),
            Some("Kamala Harris for President")
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].standardized, "Kamala Harris for President");
        assert_eq!(groups[0].total, 4);
        assert_eq!(groups[0].variations.len(), 3);
    }

    #[test]
    fn test_build_mapping_filters_entity_and_office_echoes() {
        let canon = CanonicalMatcher::builtin();
        let mut entity = political_record("Entity 12345");
        entity.sponsor = Some("Entity 12345".to_string());
        let mut echo = political_record("President");
        echo.office = Some("President".to_string());
        let mut non_political = political_record("Harris for President");
        non_political.record_type = RecordType::NonPolitical;

        let (mapping, _, stats) = build_mapping(&[entity, echo, non_political], &canon);
        assert!(mapping.is_empty());
        assert_eq!(stats.original_count, 0);
        assert_eq!(stats.merged_count, 0);
    }

    #[test]
    fn test_apply_mapping() {
        let canon = CanonicalMatcher::builtin();
        let records = vec![
            political_record("HARRIS FOR PRESIDENT"),
            {
                let mut r = political_record("SOME EEO UPLOAD");
                r.record_type = RecordType::NonPolitical;
                r
            },
            {
                let mut r = political_record("ignored");
                r.sponsor = None;
                r
            },
        ];

        let (mapping, _, _) = build_mapping(&records, &canon);
        let standardized = apply_mapping(records, &mapping);

        assert_eq!(
            standardized[0].sponsor_normalized.as_deref(),
            Some("Kamala Harris for President")
        );
        // Unmapped sponsors fall back to basic recapitalization.
        assert_eq!(
            standardized[1].sponsor_normalized.as_deref(),
            Some("Some EEO Upload")
        );
        assert!(standardized[2].sponsor_normalized.is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("o'brien"), "O'Brien");
        assert_eq!(title_case("SMITH"), "Smith");
        assert_eq!(title_case("mcdonald-smith"), "Mcdonald-Smith");
        assert_eq!(title_case("2024"), "2024");
    }
}
