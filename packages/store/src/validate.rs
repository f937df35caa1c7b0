//! Schema checks applied to every record entering a store.

use std::fmt::Display;
use std::ops::RangeInclusive;

use farm_monitor_farm_models::FarmRecord;

const ID_PREFIX: &str = "FARM_";

/// Returns a description of the first schema violation in `record`.
pub fn validate_record(record: &FarmRecord) -> Result<(), String> {
    validate_id(&record.id)?;

    if record.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }

    check_range("size", record.size, 50..=450)?;
    check_range("herdSize", record.herd_size, 80..=380)?;
    check_range("naturalHabitatPct", record.natural_habitat_pct, 5..=30)?;
    check_range("waterEfficiencyPct", record.water_efficiency_pct, 70..=95)?;
    check_range("biodiversityScore", record.biodiversity_score, 40..=90)?;
    check_range(
        "nitrogenEfficiencyPct",
        record.nitrogen_efficiency_pct,
        45..=85,
    )?;
    check_range(
        "phosphorusEfficiencyPct",
        record.phosphorus_efficiency_pct,
        50..=85,
    )?;
    check_range("overallScore", record.overall_score, 50..=90)?;
    check_range("milkVolume", record.milk_volume, 500_000..=2_500_000)?;
    check_range(
        "sustainabilityPremium",
        record.sustainability_premium,
        0..=5000,
    )?;

    validate_soil_health(record.soil_health)
}

fn validate_id(id: &str) -> Result<(), String> {
    let digits = id
        .strip_prefix(ID_PREFIX)
        .ok_or_else(|| format!("id '{id}' must start with {ID_PREFIX}"))?;

    if digits.len() < 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("id '{id}' must match {ID_PREFIX}NNN"));
    }

    Ok(())
}

fn validate_soil_health(value: f64) -> Result<(), String> {
    check_range("soilHealth", value, 3.0..=6.0)?;

    // One decimal place.
    let scaled = value * 10.0;
    if (scaled - scaled.round()).abs() > 1e-6 {
        return Err(format!("soilHealth {value} must have one decimal place"));
    }

    Ok(())
}

fn check_range<T>(field: &str, value: T, range: RangeInclusive<T>) -> Result<(), String>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{field} {value} out of range {}-{}",
            range.start(),
            range.end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use farm_monitor_farm_models::{Region, SupplierTier};

    use super::*;
    use crate::tests::fixture;

    #[test]
    fn accepts_valid_record() {
        let record = fixture("FARM_042", Region::NorthEast, SupplierTier::Bronze);
        assert_eq!(validate_record(&record), Ok(()));
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(validate_id("FARM_1").is_err());
        assert!(validate_id("FARM_00a").is_err());
        assert!(validate_id("farm_001").is_err());
        assert!(validate_id("FARM_1000").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let mut record = fixture("FARM_001", Region::NorthEast, SupplierTier::Bronze);
        record.name = "  ".to_string();
        assert!(validate_record(&record).unwrap_err().contains("name"));
    }

    #[test]
    fn soil_health_needs_one_decimal() {
        assert!(validate_soil_health(4.0).is_ok());
        assert!(validate_soil_health(5.9).is_ok());
        assert!(validate_soil_health(4.25).is_err());
        assert!(validate_soil_health(6.1).is_err());
        assert!(validate_soil_health(f64::NAN).is_err());
    }
}
