//! Output modules for the CSV, JSON, and text-report files.
//!
//! # Submodules
//!
//! - [`csv`]: Reads and writes the station-roster CSVs
//! - [`json`]: Reads and writes the JSON record files
//! - [`reports`]: Renders the human-readable text reports
//!
//! # File Chain
//!
//! ```text
//! urban_radio_stations.csv              # fetch-stations
//! urban_radio_stations_checked.csv      # fcc-lookup
//! urban_radio_stations_with_status.csv  # check-urls
//! radio_ads.json                        # fetch-feeds (merged across runs)
//! radio_ads_tagged.json                 # tag
//! radio_ads_standardized.json           # standardize
//! sponsor_mapping.json                  # standardize
//! sponsor_standardization_report.txt    # standardize
//! non_political_ads.json                # non-political
//! non_political_ads_report.txt          # non-political
//! radio_ads_heatmap.json                # minify (compact)
//! ```

pub mod csv;
pub mod json;
pub mod reports;
