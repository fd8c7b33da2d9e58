//! Text-report rendering.
//!
//! Each report is rendered to a `String`; callers decide whether it goes
//! to a file, stdout, or both. All three use a plain banner-and-sections
//! layout that reads well in a terminal or a text file.

use crate::classify::TagStats;
use crate::models::{NonPoliticalAnalysis, RecordType, TaggedRecord};
use crate::sponsors::{MappingStats, VariationGroup};
use crate::utils::group_thousands;
use std::collections::BTreeMap;
use std::fmt::Write;

const BANNER: &str = "================================================================================";
const RULE: &str = "--------------------------------------------------------------------------------";

/// Number of variation groups listed in the standardization report.
const MAX_REPORTED_GROUPS: usize = 100;
/// Number of original spellings listed per group.
const MAX_REPORTED_VARIATIONS: usize = 15;
/// Number of example records listed per non-political category.
const MAX_CATEGORY_EXAMPLES: usize = 5;

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Render the tagging summary printed after the tag stage.
pub fn tagging_report(stats: &TagStats, tagged: &[TaggedRecord]) -> String {
    let total = stats.total();
    let mut out = String::new();

    writeln!(out, "{BANNER}").unwrap();
    writeln!(out, "DATA CLEANING COMPLETE").unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Total records: {}", group_thousands(total)).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Record Types:").unwrap();
    writeln!(
        out,
        "  Political Ads (Political Files):              {:>6} ({:5.1}%)",
        group_thousands(stats.political_ad),
        percent(stats.political_ad, total)
    )
    .unwrap();
    writeln!(
        out,
        "  Political Matters & Controversial Issues:     {:>6} ({:5.1}%)",
        group_thousands(stats.political_matters),
        percent(stats.political_matters, total)
    )
    .unwrap();
    writeln!(
        out,
        "  Non-Political (EEO, FCC Admin, etc):          {:>6} ({:5.1}%)",
        group_thousands(stats.non_political),
        percent(stats.non_political, total)
    )
    .unwrap();
    writeln!(
        out,
        "  Unknown/Malformed:                            {:>6} ({:5.1}%)",
        group_thousands(stats.unknown),
        percent(stats.unknown, total)
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Enhancements:").unwrap();
    writeln!(
        out,
        "  Station call signs extracted from URLs:      {:>6}",
        group_thousands(stats.station_extracted)
    )
    .unwrap();
    writeln!(
        out,
        "  Years extracted from file paths:             {:>6}",
        group_thousands(stats.year_extracted)
    )
    .unwrap();

    if let (Some(earliest), Some(latest)) = (stats.earliest_updated, stats.latest_updated) {
        writeln!(out).unwrap();
        writeln!(
            out,
            "Updated range: {} to {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "EXAMPLES:").unwrap();
    writeln!(out, "{BANNER}").unwrap();

    for record_type in [
        RecordType::PoliticalAd,
        RecordType::PoliticalMatters,
        RecordType::NonPolitical,
    ] {
        let Some(example) = tagged.iter().find(|r| r.record_type == record_type) else {
            continue;
        };
        writeln!(out).unwrap();
        writeln!(out, "{}:", record_type.to_string().to_uppercase()).unwrap();
        writeln!(out, "  Title: {}...", truncate_chars(&example.title, 80)).unwrap();
        writeln!(
            out,
            "  Station: {}",
            example.station.as_deref().unwrap_or("N/A")
        )
        .unwrap();
        writeln!(
            out,
            "  Year: {}",
            example.year.map_or("N/A".to_string(), |y| y.to_string())
        )
        .unwrap();
        writeln!(
            out,
            "  Office: {}",
            example.office.as_deref().unwrap_or("N/A")
        )
        .unwrap();
        writeln!(
            out,
            "  Sponsor: {}",
            example.sponsor.as_deref().unwrap_or("N/A")
        )
        .unwrap();
        writeln!(
            out,
            "  Path: {}",
            truncate_chars(example.file_path.as_deref().unwrap_or("N/A"), 80)
        )
        .unwrap();
    }

    out
}

/// Render the sponsor-standardization report.
pub fn standardization_report(stats: &MappingStats, groups: &[VariationGroup]) -> String {
    let mut out = String::new();

    writeln!(out, "{BANNER}").unwrap();
    writeln!(out, "SPONSOR STANDARDIZATION REPORT").unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "Original unique sponsors: {}",
        group_thousands(stats.original_count)
    )
    .unwrap();
    writeln!(
        out,
        "Standardized unique sponsors: {}",
        group_thousands(stats.standardized_count)
    )
    .unwrap();
    writeln!(out, "Sponsors merged: {}", group_thousands(stats.merged_count)).unwrap();
    writeln!(out, "Reduction: {:.1}%", stats.reduction_percent()).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out, "TOP MERGED SPONSORS").unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out).unwrap();

    for (i, group) in groups.iter().take(MAX_REPORTED_GROUPS).enumerate() {
        writeln!(
            out,
            "{}. {} ({} ads total)",
            i + 1,
            group.standardized,
            group_thousands(group.total)
        )
        .unwrap();

        let mut variations = group.variations.clone();
        variations.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        for (original, count) in variations.iter().take(MAX_REPORTED_VARIATIONS) {
            if *original == group.standardized {
                writeln!(out, "   → \"{}\" ({} ads) [CANONICAL]", original, group_thousands(*count))
                    .unwrap();
            } else {
                writeln!(out, "   - \"{}\" ({} ads)", original, group_thousands(*count)).unwrap();
            }
        }
        if variations.len() > MAX_REPORTED_VARIATIONS {
            writeln!(
                out,
                "   ... and {} more variations",
                variations.len() - MAX_REPORTED_VARIATIONS
            )
            .unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}

/// Render the mapping examples for presidential committees.
///
/// Shown on stdout after standardization as a quick sanity check that the
/// highest-volume merges behaved.
pub fn key_standardizations(mapping: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    writeln!(out, "KEY STANDARDIZATIONS:").unwrap();
    writeln!(out, "{RULE}").unwrap();

    for (label, needle) in [("Harris", "harris"), ("Biden", "biden")] {
        let examples: Vec<(&String, &String)> = mapping
            .iter()
            .filter(|(original, _)| {
                let lowered = original.to_lowercase();
                lowered.contains(needle) && lowered.contains("president")
            })
            .take(10)
            .collect();
        if examples.is_empty() {
            continue;
        }
        writeln!(out).unwrap();
        writeln!(out, "{label} Presidential campaign variations:").unwrap();
        for (original, standardized) in examples {
            writeln!(out, "  \"{original}\" → \"{standardized}\"").unwrap();
        }
    }

    out
}

/// Render the non-political analysis report.
pub fn non_political_report(analysis: &NonPoliticalAnalysis) -> String {
    let summary = &analysis.summary;
    let total = summary.total_records;
    let mut out = String::new();

    writeln!(out, "{BANNER}").unwrap();
    writeln!(out, "NON-POLITICAL FILE ANALYSIS").unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Total records: {}", group_thousands(total)).unwrap();
    writeln!(
        out,
        "Political Files: {} ({:.1}%)",
        group_thousands(summary.political_files),
        percent(summary.political_files, total)
    )
    .unwrap();
    writeln!(
        out,
        "Non-Political Files: {} ({:.1}%)",
        group_thousands(summary.non_political_files),
        percent(summary.non_political_files, total)
    )
    .unwrap();
    writeln!(out, "Malformed titles: {}", group_thousands(summary.malformed)).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "NON-POLITICAL CATEGORIES:").unwrap();
    writeln!(out, "{RULE}").unwrap();
    for group in &analysis.categories {
        writeln!(
            out,
            "{:>6} records - {}",
            group_thousands(group.count),
            group.category
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "{BANNER}").unwrap();
    writeln!(out, "DETAILED EXAMPLES").unwrap();
    writeln!(out, "{BANNER}").unwrap();

    for group in &analysis.categories {
        writeln!(out).unwrap();
        writeln!(out, "{} ({} records)", group.category, group_thousands(group.count)).unwrap();
        writeln!(out, "{RULE}").unwrap();

        for record in group.records.iter().take(MAX_CATEGORY_EXAMPLES) {
            let path = crate::classify::file_path_from_title(&record.title)
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(out, "  Full Path: {path}").unwrap();
            writeln!(
                out,
                "  Sponsor (parsed): {}",
                record.sponsor.as_deref().unwrap_or("N/A")
            )
            .unwrap();
            writeln!(
                out,
                "  Office (parsed): {}",
                record.office.as_deref().unwrap_or("N/A")
            )
            .unwrap();
            writeln!(out, "  Updated: {}", record.updated).unwrap();
            writeln!(out, "  URL: {}", record.url).unwrap();
            writeln!(out).unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{group_non_political, tag_records};
    use crate::models::AdEntry;

    fn entry(title: &str, id: &str) -> AdEntry {
        AdEntry {
            title: title.to_string(),
            url: "https://publicfiles.fcc.gov/fm-profile/WVEE/file.pdf".to_string(),
            id: id.to_string(),
            updated: "2024-10-30T12:00:00Z".to_string(),
            facility_id: None,
            office: None,
            sponsor: Some("Raw Sponsor".to_string()),
            station_url: "https://publicfiles.fcc.gov/fm-profile/WVEE/rss".to_string(),
            state: None,
            city: None,
        }
    }

    #[test]
    fn test_tagging_report_sections() {
        let entries = vec![
            entry(
                "uploaded in Political Files/2024/Federal/US Senate/Jane Doe on 10/30/2024",
                "a",
            ),
            entry("uploaded in EEO/2024/Report on 1/1/2024", "b"),
        ];
        let (tagged, stats) = tag_records(entries);
        let report = tagging_report(&stats, &tagged);

        assert!(report.contains("DATA CLEANING COMPLETE"));
        assert!(report.contains("Total records: 2"));
        assert!(report.contains("Political Ads (Political Files)"));
        assert!(report.contains("( 50.0%)"));
        assert!(report.contains("Updated range: 2024-10-30 to 2024-10-30"));
        assert!(report.contains("POLITICAL_AD:"));
        assert!(report.contains("NON_POLITICAL:"));
        // No political-matters record, so no example section for it.
        assert!(!report.contains("POLITICAL_MATTERS:"));
    }

    #[test]
    fn test_standardization_report_marks_canonical() {
        let stats = MappingStats {
            original_count: 3,
            standardized_count: 1,
            merged_count: 2,
        };
        let groups = vec![VariationGroup {
            standardized: "Kamala Harris for President".to_string(),
            variations: vec![
                ("HARRIS FOR PRESIDENT".to_string(), 5),
                ("Kamala Harris for President".to_string(), 2),
                ("Harris D President".to_string(), 1),
            ],
            total: 8,
        }];

        let report = standardization_report(&stats, &groups);
        assert!(report.contains("Original unique sponsors: 3"));
        assert!(report.contains("Reduction: 66.7%"));
        assert!(report.contains("1. Kamala Harris for President (8 ads total)"));
        assert!(report.contains("→ \"Kamala Harris for President\" (2 ads) [CANONICAL]"));
        assert!(report.contains("- \"HARRIS FOR PRESIDENT\" (5 ads)"));
    }

    #[test]
    fn test_key_standardizations() {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "HARRIS FOR PRESIDENT".to_string(),
            "Kamala Harris for President".to_string(),
        );
        mapping.insert("Unrelated".to_string(), "Unrelated".to_string());

        let out = key_standardizations(&mapping);
        assert!(out.contains("Harris Presidential campaign variations:"));
        assert!(out.contains("\"HARRIS FOR PRESIDENT\" → \"Kamala Harris for President\""));
        assert!(!out.contains("Biden"));
    }

    #[test]
    fn test_non_political_report() {
        let entries = vec![
            entry("uploaded in EEO/2024/Report on 1/1/2024", "a"),
            entry("uploaded in EEO/2023/Report on 1/1/2023", "b"),
            entry("malformed", "c"),
        ];
        let analysis = group_non_political(&entries);
        let report = non_political_report(&analysis);

        assert!(report.contains("NON-POLITICAL FILE ANALYSIS"));
        assert!(report.contains("2 records - EEO"));
        assert!(report.contains("Malformed Titles"));
        assert!(report.contains("Full Path: EEO/2024/Report"));
        assert!(report.contains("Sponsor (parsed): Raw Sponsor"));
    }
}
