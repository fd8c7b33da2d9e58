//! CSV input/output for the station roster files.
//!
//! The roster structs in [`crate::models`] carry serde renames matching
//! the human-readable column headers, so reading and writing reduce to
//! generic serde round-trips.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use tracing::{info, instrument};

/// Read all rows of a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row fails to
/// deserialize into `T`.
#[instrument(level = "info", skip_all, fields(%path))]
pub fn read_rows<T>(path: &str) -> Result<Vec<T>, Box<dyn Error>>
where
    T: DeserializeOwned,
{
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    info!(count = rows.len(), "Read CSV rows");
    Ok(rows)
}

/// Write rows to a CSV file, headers included.
#[instrument(level = "info", skip_all, fields(%path))]
pub fn write_rows<T>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
{
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(count = rows.len(), "Wrote CSV rows");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationRow;

    #[test]
    fn test_csv_round_trip() {
        let dir = std::env::temp_dir().join("airwave_ads_csv_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stations.csv");
        let path = path.to_str().unwrap();

        let rows = vec![
            StationRow {
                state: "Georgia".to_string(),
                city: "Atlanta".to_string(),
                station: "WVEE".to_string(),
                format: "Urban contemporary".to_string(),
            },
            StationRow {
                state: "New York".to_string(),
                city: "New York".to_string(),
                station: "WQHT/WBLS".to_string(),
                format: "Unknown Format".to_string(),
            },
        ];

        write_rows(path, &rows).unwrap();
        let read_back: Vec<StationRow> = read_rows(path).unwrap();

        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].station, "WVEE");
        assert_eq!(read_back[1].city, "New York");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_rows_missing_file() {
        let result: Result<Vec<StationRow>, _> = read_rows("/nonexistent/stations.csv");
        assert!(result.is_err());
    }
}
