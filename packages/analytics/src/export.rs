//! CSV export of a filtered subset.
//!
//! Unlike the table view, exports contain every field of every matching
//! record, with the same camelCase column names as the JSON API.

use std::io::Write;

use farm_monitor_farm_models::FarmRecord;

use crate::AnalyticsError;

/// Writes `records` as CSV (with a header row) to `writer`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if encoding or writing fails.
pub fn write_csv<W: Write>(records: &[&FarmRecord], writer: W) -> Result<(), AnalyticsError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders `records` as a CSV string.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if encoding fails.
pub fn to_csv_string(records: &[&FarmRecord]) -> Result<String, AnalyticsError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
