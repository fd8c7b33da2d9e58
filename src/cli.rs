//! Command-line interface definitions for the disclosure pipeline.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Each subcommand is one independent pipeline stage; stages are
//! chained through their input/output files, and the default file names
//! reproduce the conventional chain so running the stages back to back
//! with no arguments works end to end.

use clap::{Parser, Subcommand};

use crate::scrapers::wikipedia::DIRECTORY_URL;

/// Command-line arguments for the disclosure pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape the station directory into a CSV
/// airwave_ads fetch-stations
///
/// # Resolve stations against the FCC facility search API
/// airwave_ads fcc-lookup
///
/// # Pull each station's public-file feed and merge into radio_ads.json
/// airwave_ads fetch-feeds
///
/// # Tag, normalize sponsors, and export the heatmap JSON
/// airwave_ads tag && airwave_ads standardize && airwave_ads minify
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// One pipeline stage per subcommand.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape the radio-station directory page into a CSV of stations
    FetchStations {
        /// URL of the station directory page
        #[arg(long, default_value = DIRECTORY_URL)]
        url: String,

        /// Output CSV path
        #[arg(short, long, default_value = "urban_radio_stations.csv")]
        out: String,
    },

    /// Resolve each station against the FCC facility search API
    FccLookup {
        /// Input CSV of stations
        #[arg(short, long, default_value = "urban_radio_stations.csv")]
        input: String,

        /// Output CSV with match columns and public-file URLs
        #[arg(short, long, default_value = "urban_radio_stations_checked.csv")]
        out: String,
    },

    /// Probe each station's public-file feed URL and record the HTTP status
    CheckUrls {
        /// Input CSV of checked stations
        #[arg(short, long, default_value = "urban_radio_stations_checked.csv")]
        input: String,

        /// Output CSV with an HTTP status column
        #[arg(short, long, default_value = "urban_radio_stations_with_status.csv")]
        out: String,
    },

    /// Pull every station's public-file feed and merge new entries into the
    /// output file
    FetchFeeds {
        /// Input CSV of stations with public-file URLs
        #[arg(short, long, default_value = "urban_radio_stations_with_status.csv")]
        stations: String,

        /// Output JSON file; existing entries are kept and deduplicated by id
        #[arg(short, long, default_value = "radio_ads.json")]
        out: String,
    },

    /// Categorize records and extract station call signs and filing years
    Tag {
        /// Input JSON of raw feed entries
        #[arg(short, long, default_value = "radio_ads.json")]
        input: String,

        /// Output JSON of tagged records
        #[arg(short, long, default_value = "radio_ads_tagged.json")]
        out: String,
    },

    /// Normalize sponsor names and write the mapping and report
    Standardize {
        /// Input JSON of tagged records
        #[arg(short, long, default_value = "radio_ads_tagged.json")]
        input: String,

        /// Output JSON of standardized records
        #[arg(short, long, default_value = "radio_ads_standardized.json")]
        out: String,

        /// Output JSON mapping of original to standardized sponsor names
        #[arg(long, default_value = "sponsor_mapping.json")]
        mapping_out: String,

        /// Output text report of merged sponsor variations
        #[arg(long, default_value = "sponsor_standardization_report.txt")]
        report_out: String,

        /// Optional YAML file of canonical sponsor names; replaces the
        /// built-in table
        #[arg(long, env = "CANONICAL_SPONSORS")]
        canonical: Option<String>,
    },

    /// Group non-political filings by category and write a report
    NonPolitical {
        /// Input JSON of raw feed entries
        #[arg(short, long, default_value = "radio_ads.json")]
        input: String,

        /// Output JSON of categorized non-political records
        #[arg(short, long, default_value = "non_political_ads.json")]
        out: String,

        /// Output text report path
        #[arg(long, default_value = "non_political_ads_report.txt")]
        report_out: String,
    },

    /// Project standardized records down to the fields the heatmap uses
    Minify {
        /// Input JSON of standardized records
        #[arg(short, long, default_value = "radio_ads_standardized.json")]
        input: String,

        /// Output compact JSON path
        #[arg(short, long, default_value = "radio_ads_heatmap.json")]
        out: String,
    },
}
