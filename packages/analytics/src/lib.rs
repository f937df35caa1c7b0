#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter and aggregation engine for the farm dashboard.
//!
//! [`filter::apply`] narrows the full record set to the subset matching a
//! [`FilterCriteria`]; [`aggregate::summarize`] turns that subset into a
//! [`DashboardSummary`]. Both are pure: they never mutate the records and
//! keep no state between calls, so every recomputation starts from the full
//! record set.

pub mod aggregate;
pub mod export;
pub mod filter;

use farm_monitor_analytics_models::{DashboardSummary, FilterCriteria, SummaryOptions};
use farm_monitor_farm_models::FarmRecord;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing export output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Filters `records` by `criteria` and summarizes the result.
#[must_use]
pub fn run(
    records: &[FarmRecord],
    criteria: &FilterCriteria,
    options: &SummaryOptions,
) -> DashboardSummary {
    let subset = filter::apply(records, criteria);
    log::debug!(
        "Filtered {} of {} farms ({criteria})",
        subset.len(),
        records.len()
    );
    aggregate::summarize(&subset, records.len(), options)
}


#[cfg(test)]
mod tests {
    use farm_monitor_analytics_models::{FarmTable, Selector};
    use farm_monitor_farm_models::{Region, RiskLevel, SupplierTier};

    use super::*;
    use crate::testing::farm;

    fn portfolio() -> Vec<FarmRecord> {
        (1..=270)
            .map(|n| {
                let mut record = farm(n);
                record.region = Region::all()[n % Region::all().len()];
                record.supplier_tier = SupplierTier::all()[n % 3];
                record.drought_risk = RiskLevel::all()[n % 3];
                record.flood_risk = RiskLevel::all()[(n / 3) % 3];
                record
            })
            .collect()
    }

    #[test]
    fn default_criteria_covers_whole_portfolio() {
        let records = portfolio();
        let summary = run(&records, &FilterCriteria::default(), &SummaryOptions::default());

        assert_eq!(summary.cards.total_farms, 270);
        assert_eq!(summary.filter_summary.to_string(), "Showing 270 of 270 farms");

        let rows = summary.table.rows();
        assert_eq!(rows.len(), 50);
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.id, record.id);
        }
    }

    #[test]
    fn search_by_exact_id() {
        let records = portfolio();
        let criteria = FilterCriteria::default().with_search("FARM_001");
        let summary = run(&records, &criteria, &SummaryOptions::default());

        assert_eq!(summary.cards.total_farms, 1);
        assert_eq!(summary.table.rows()[0].id, "FARM_001");
    }

    #[test]
    fn same_criteria_same_summary() {
        let records = portfolio();
        let criteria = FilterCriteria::default()
            .with_tier(SupplierTier::Gold)
            .with_risk(RiskLevel::Medium);

        let a = run(&records, &criteria, &SummaryOptions::default());
        let b = run(&records, &criteria, &SummaryOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn unrecognized_selector_yields_empty_dashboard() {
        let records = portfolio();
        let criteria =
            FilterCriteria::default().with_region(Selector::Unrecognized("Wales".to_string()));
        let summary = run(&records, &criteria, &SummaryOptions::default());

        assert_eq!(summary.cards.total_farms, 0);
        assert_eq!(summary.table, FarmTable::NoMatches);
        assert_eq!(summary.filter_summary.total, 270);
    }
}
