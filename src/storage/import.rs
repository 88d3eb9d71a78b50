//! Observation Import
//!
//! Reads observation files in the ingestion payload shape:
//! - JSON: an array of observation objects
//! - CSV: one observation per row, header names matching the JSON fields
//!
//! Rows that fail to parse or validate are skipped and reported.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::WeatherObservation;
use std::path::Path;

/// Result of an import operation
#[derive(Debug, Default)]
pub struct ImportResult {
    pub observations: Vec<WeatherObservation>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    fn accept(&mut self, row: usize, parsed: Result<WeatherObservation, String>) {
        self.rows_processed += 1;

        let outcome = parsed.and_then(|obs| {
            let problems = obs.validate();
            if problems.is_empty() {
                Ok(obs)
            } else {
                Err(problems.join("; "))
            }
        });

        match outcome {
            Ok(obs) => self.observations.push(obs),
            Err(e) => {
                self.rows_failed += 1;
                self.errors.push(format!("Row {}: {}", row, e));
            }
        }
    }
}

/// Import a file, picking the format from its extension (`.json` or `.csv`)
pub fn import_file(path: &Path) -> StorageResult<ImportResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let content = std::fs::read_to_string(path)?;

    match extension.as_deref() {
        Some("json") => import_json_str(&content),
        Some("csv") => import_csv_str(&content),
        _ => Err(StorageError::Import(format!(
            "unsupported file type {:?} (expected .json or .csv)",
            path
        ))),
    }
}

/// Import a JSON array of observations
pub fn import_json_str(content: &str) -> StorageResult<ImportResult> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(content)
        .map_err(|e| StorageError::Import(format!("expected a JSON array: {}", e)))?;

    let mut result = ImportResult::default();
    for (index, value) in rows.into_iter().enumerate() {
        let parsed = serde_json::from_value::<WeatherObservation>(value).map_err(|e| e.to_string());
        result.accept(index + 1, parsed);
    }

    Ok(result)
}

/// Import CSV rows with a header line
pub fn import_csv_str(content: &str) -> StorageResult<ImportResult> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut result = ImportResult::default();
    for (index, row) in reader.deserialize::<WeatherObservation>().enumerate() {
        result.accept(index + 1, row.map_err(|e| e.to_string()));
    }

    Ok(result)
}
