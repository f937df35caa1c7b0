//! Data sources that produce the farm records a store is built from.

use std::path::{Path, PathBuf};

use farm_monitor_farm_models::FarmRecord;

use crate::StoreError;

/// Produces the full record set for a session.
///
/// Implementations are called once at startup; the records they return are
/// validated by [`crate::FarmStore::from_source`].
pub trait FarmSource {
    /// Short description used in log output (e.g. `"synthetic (seed 42)"`).
    fn describe(&self) -> String;

    /// Produces every record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the records cannot be produced.
    fn load(&self) -> Result<Vec<FarmRecord>, StoreError>;
}

/// Reads a JSON array of camelCase farm records from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FarmSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<FarmRecord>, StoreError> {
        let contents = std::fs::read_to_string(&self.path)?;
        parse_records(&contents)
    }
}

/// Parses a JSON array of farm records.
///
/// Each element is decoded separately so that a missing or mistyped field
/// is reported against the record it belongs to.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if the input is not a JSON array, or
/// [`StoreError::MalformedRecord`] if an element is not a valid record.
pub fn parse_records(json: &str) -> Result<Vec<FarmRecord>, StoreError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let id = value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("<unknown>")
                .to_string();
            serde_json::from_value(value).map_err(|e| StoreError::MalformedRecord {
                index,
                id,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use farm_monitor_farm_models::{Region, SupplierTier};

    use super::*;
    use crate::tests::fixture;

    #[test]
    fn parses_serialized_records() {
        let records = vec![
            fixture("FARM_001", Region::SouthEast, SupplierTier::Gold),
            fixture("FARM_002", Region::NorthWest, SupplierTier::Bronze),
        ];
        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(parse_records(&json).unwrap(), records);
    }

    #[test]
    fn reports_missing_field_against_record() {
        let mut value =
            serde_json::to_value(fixture("FARM_007", Region::SouthEast, SupplierTier::Gold))
                .unwrap();
        value.as_object_mut().unwrap().remove("floodRisk");
        let json = serde_json::Value::Array(vec![value]).to_string();

        match parse_records(&json).unwrap_err() {
            StoreError::MalformedRecord { index, id, reason } => {
                assert_eq!(index, 0);
                assert_eq!(id, "FARM_007");
                assert!(reason.contains("floodRisk"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(matches!(
            parse_records("{\"id\": \"FARM_001\"}"),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = JsonFileSource::new("/nonexistent/farms.json");
        assert!(matches!(source.load(), Err(StoreError::Io(_))));
    }
}
