//! # Airwave Ads
//!
//! A batch pipeline that collects political-advertising disclosures from
//! radio station public files and normalizes them into JSON for a static
//! heatmap page.
//!
//! ## Features
//!
//! - Scrapes a public directory of urban-format radio stations
//! - Resolves stations against the FCC facility search API and derives
//!   each station's public-file feed URL
//! - Pulls every station's filing feed and merges new entries across runs
//! - Classifies records (political ads, political matters, non-political)
//!   and extracts stations, years, offices, and sponsors from filing paths
//! - Normalizes sponsor names with canonical-committee matching
//! - Exports a minimal compact JSON for the heatmap page
//!
//! ## Usage
//!
//! ```sh
//! airwave_ads fetch-stations
//! airwave_ads fcc-lookup
//! airwave_ads check-urls
//! airwave_ads fetch-feeds
//! airwave_ads tag
//! airwave_ads standardize
//! airwave_ads minify
//! ```
//!
//! ## Architecture
//!
//! Each subcommand is an independent leaf transform: read one file (or a
//! set of feeds), apply one pass, write one or two output files. Stages
//! are chained only through their default file names, so any stage can be
//! re-run in isolation.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod classify;
mod cli;
mod fcc;
mod feeds;
mod models;
mod outputs;
mod scrapers;
mod sponsors;
mod utils;

use cli::{Cli, Command};
use models::{AdEntry, CheckedStationRow, MinimalRecord, StandardizedRecord, StationRow, TaggedRecord};
use outputs::reports;
use sponsors::CanonicalMatcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("airwave_ads starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Command::FetchStations { url, out } => run_fetch_stations(&url, &out).await?,
        Command::FccLookup { input, out } => run_fcc_lookup(&input, &out).await?,
        Command::CheckUrls { input, out } => run_check_urls(&input, &out).await?,
        Command::FetchFeeds { stations, out } => run_fetch_feeds(&stations, &out).await?,
        Command::Tag { input, out } => run_tag(&input, &out).await?,
        Command::Standardize {
            input,
            out,
            mapping_out,
            report_out,
            canonical,
        } => run_standardize(&input, &out, &mapping_out, &report_out, canonical.as_deref()).await?,
        Command::NonPolitical {
            input,
            out,
            report_out,
        } => run_non_political(&input, &out, &report_out).await?,
        Command::Minify { input, out } => run_minify(&input, &out).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Scrape the station directory into the roster CSV.
#[instrument(level = "info", skip_all, fields(%out))]
async fn run_fetch_stations(url: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let stations = scrapers::wikipedia::fetch_directory(url).await?;
    outputs::csv::write_rows(out, &stations)?;
    info!(count = stations.len(), path = %out, "Station roster saved");
    Ok(())
}

/// Annotate the roster with FCC facility matches and public-file URLs.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_fcc_lookup(input: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let stations: Vec<StationRow> = outputs::csv::read_rows(input)?;
    let client = Client::new();
    let checked = fcc::annotate_stations(&client, stations).await;

    let city_matches = checked.iter().filter(|row| row.city_match == "Yes").count();
    let state_matches = checked.iter().filter(|row| row.state_match == "Yes").count();
    info!(
        count = checked.len(),
        city_matches,
        state_matches,
        "Facility lookup complete"
    );

    outputs::csv::write_rows(out, &checked)?;
    Ok(())
}

/// Probe the public-file feed URLs and record their HTTP status.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_check_urls(input: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let rows: Vec<CheckedStationRow> = outputs::csv::read_rows(input)?;
    let client = Client::new();
    let rows = fcc::check_station_urls(&client, rows).await;
    outputs::csv::write_rows(out, &rows)?;
    Ok(())
}

/// Pull every station feed and merge new entries into the output file.
#[instrument(level = "info", skip_all, fields(%stations, %out))]
async fn run_fetch_feeds(stations: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let rows = outputs::csv::read_rows(stations)?;
    let existing: Vec<AdEntry> = outputs::json::read_records_or_empty(out).await?;
    let existing_count = existing.len();

    let client = Client::new();
    let fetched = feeds::collect_entries(&client, rows).await;
    let merged = feeds::merge_entries(existing, fetched);

    info!(
        existing = existing_count,
        total = merged.len(),
        added = merged.len() - existing_count,
        "Merged feed entries"
    );
    outputs::json::write_pretty(out, &merged).await?;
    Ok(())
}

/// Classify, tag, and clean the raw feed entries.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_tag(input: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let entries: Vec<AdEntry> = outputs::json::read_records(input).await?;
    info!(count = entries.len(), "Processing records");

    let (tagged, stats) = classify::tag_records(entries);
    outputs::json::write_pretty(out, &tagged).await?;

    println!("{}", reports::tagging_report(&stats, &tagged));
    Ok(())
}

/// Normalize sponsor names and write the standardized records, the
/// mapping, and the variation report.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_standardize(
    input: &str,
    out: &str,
    mapping_out: &str,
    report_out: &str,
    canonical: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let records: Vec<TaggedRecord> = outputs::json::read_records(input).await?;

    let matcher = match canonical {
        Some(path) => sponsors::load_canonical_matcher(path)?,
        None => CanonicalMatcher::builtin(),
    };

    let (mapping, groups, stats) = sponsors::build_mapping(&records, &matcher);
    let standardized = sponsors::apply_mapping(records, &mapping);

    outputs::json::write_pretty(out, &standardized).await?;
    outputs::json::write_pretty(mapping_out, &mapping).await?;

    let report = reports::standardization_report(&stats, &groups);
    tokio::fs::write(report_out, &report).await?;
    info!(path = %report_out, "Wrote standardization report");

    println!("{report}");
    println!("{}", reports::key_standardizations(&mapping));
    Ok(())
}

/// Group non-political filings by category and write the analysis.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_non_political(input: &str, out: &str, report_out: &str) -> Result<(), Box<dyn Error>> {
    let entries: Vec<AdEntry> = outputs::json::read_records(input).await?;
    let analysis = classify::group_non_political(&entries);

    let report = reports::non_political_report(&analysis);
    tokio::fs::write(report_out, &report).await?;
    outputs::json::write_pretty(out, &analysis).await?;

    println!("{report}");
    Ok(())
}

/// Project standardized records to the heatmap fields and write compact JSON.
#[instrument(level = "info", skip_all, fields(%input, %out))]
async fn run_minify(input: &str, out: &str) -> Result<(), Box<dyn Error>> {
    let records: Vec<StandardizedRecord> = outputs::json::read_records(input).await?;
    let minimal: Vec<MinimalRecord> = records.iter().map(MinimalRecord::from).collect();
    outputs::json::write_compact(out, &minimal).await?;

    let original_bytes = std::fs::metadata(input)?.len();
    let minified_bytes = std::fs::metadata(out)?.len();
    let reduction = if original_bytes == 0 {
        0.0
    } else {
        (1.0 - minified_bytes as f64 / original_bytes as f64) * 100.0
    };
    info!(
        count = minimal.len(),
        original_bytes,
        minified_bytes,
        reduction_percent = reduction,
        "Minified heatmap JSON"
    );
    Ok(())
}
