//! JSON input/output for the record files.
//!
//! Intermediate files (`radio_ads*.json`) are written pretty-printed so
//! diffs between runs stay reviewable; the heatmap export is written
//! compact since it is deployed to a static page.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Read a JSON file into a list of records.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn read_records<T>(path: &str) -> Result<Vec<T>, Box<dyn Error>>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path).await?;
    let records: Vec<T> = serde_json::from_str(&raw)?;
    info!(count = records.len(), "Read JSON records");
    Ok(records)
}

/// Read a JSON file into a list of records, treating a missing file as an
/// empty list.
///
/// Used by the feed-fetch stage so the first run starts from nothing and
/// later runs merge into the existing file.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn read_records_or_empty<T>(path: &str) -> Result<Vec<T>, Box<dyn Error>>
where
    T: DeserializeOwned,
{
    match fs::read_to_string(path).await {
        Ok(raw) => {
            let records: Vec<T> = serde_json::from_str(&raw)?;
            info!(count = records.len(), "Read existing JSON records");
            Ok(records)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No existing file; starting fresh");
            Ok(Vec::new())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Write a value as pretty-printed JSON.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn write_pretty<T>(path: &str, value: &T) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(value)?;
    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;
    info!("Wrote JSON file");
    Ok(())
}

/// Write a value as compact JSON (no whitespace).
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn write_compact<T>(path: &str, value: &T) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;
    info!("Wrote compact JSON file");
    Ok(())
}

/// Create the parent directory of an output path when it has one.
async fn ensure_parent_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
