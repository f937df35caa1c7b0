//! Aggregation engine.
//!
//! Every percentage is computed against the subset size and every mean
//! over it; both are `0.0` for an empty subset.

use farm_monitor_analytics_models::{
    BiodiversityMetrics, DashboardSummary, FarmTable, FarmTableRow, FilterSummary, LandMetrics,
    MetricCards, RegionalPoint, RiskBucket, SchemeEnrollment, SummaryOptions, TierCount,
    WaterMetrics,
};
use farm_monitor_farm_models::{FarmRecord, Region, RiskLevel, SupplierTier};

/// Minimum soil health index counted as compliant.
pub const SOIL_HEALTH_THRESHOLD: f64 = 4.0;

/// Minimum water efficiency (percent) counted as compliant.
pub const WATER_EFFICIENCY_THRESHOLD: u8 = 85;

/// Builds every dashboard artifact from a filtered subset.
///
/// `total` is the size of the full record set, used only for the filter
/// summary line.
#[must_use]
pub fn summarize(
    subset: &[&FarmRecord],
    total: usize,
    options: &SummaryOptions,
) -> DashboardSummary {
    let cards = metric_cards(subset);

    DashboardSummary {
        land: land_metrics(subset),
        water: water_metrics(subset, cards.high_risk_pct),
        biodiversity: BiodiversityMetrics {
            avg_biodiversity: mean(subset, |r| f64::from(r.biodiversity_score)),
        },
        regional: regional_series(subset),
        risk: risk_series(subset),
        tiers: tier_series(subset),
        schemes: scheme_enrollment(subset),
        table: farm_table(subset, options.table_row_limit),
        filter_summary: FilterSummary {
            showing: len(subset),
            total: total as u64,
            tnfd_compliant: count(subset, |r| r.tnfd_compliant),
            sfi_enrolled: count(subset, |r| r.sfi_enrolled),
        },
        cards,
    }
}

/// Total farms, TNFD compliance, mean score and high-risk share.
#[must_use]
pub fn metric_cards(subset: &[&FarmRecord]) -> MetricCards {
    let n = len(subset);
    let high_risk_count = count(subset, |r| r.is_high_risk());

    MetricCards {
        total_farms: n,
        tnfd_compliance_pct: percentage(count(subset, |r| r.tnfd_compliant), n),
        avg_score: mean(subset, |r| f64::from(r.overall_score)),
        high_risk_count,
        high_risk_pct: percentage(high_risk_count, n),
    }
}

#[must_use]
pub fn land_metrics(subset: &[&FarmRecord]) -> LandMetrics {
    LandMetrics {
        natural_habitat_area_ha: subset.iter().map(|r| r.natural_habitat_area_ha()).sum(),
        soil_health_compliance_pct: percentage(
            count(subset, |r| r.soil_health >= SOIL_HEALTH_THRESHOLD),
            len(subset),
        ),
    }
}

#[must_use]
pub fn water_metrics(subset: &[&FarmRecord], high_risk_pct: f64) -> WaterMetrics {
    WaterMetrics {
        avg_water_efficiency: mean(subset, |r| f64::from(r.water_efficiency_pct)),
        water_compliance_pct: percentage(
            count(subset, |r| r.water_efficiency_pct >= WATER_EFFICIENCY_THRESHOLD),
            len(subset),
        ),
        risk_exposure_pct: high_risk_pct,
    }
}

/// Groups the subset by region, sorted by region name.
///
/// Regions without farms in the subset are omitted.
#[must_use]
pub fn regional_series(subset: &[&FarmRecord]) -> Vec<RegionalPoint> {
    let mut groups: Vec<(Region, Vec<&FarmRecord>)> = Vec::new();
    for &record in subset {
        match groups.iter_mut().find(|(region, _)| *region == record.region) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.region, vec![record])),
        }
    }
    groups.sort_by_cached_key(|(region, _)| region.to_string());

    groups
        .into_iter()
        .map(|(region, members)| {
            let farms = len(&members);
            RegionalPoint {
                region,
                farms,
                avg_score: mean(&members, |r| f64::from(r.overall_score)),
                tnfd_compliance_pct: percentage(count(&members, |r| r.tnfd_compliant), farms),
                total_milk_volume: members.iter().map(|r| r.milk_volume).sum(),
            }
        })
        .collect()
}

/// Drought and flood counts for Low, Medium and High, in that order.
#[must_use]
pub fn risk_series(subset: &[&FarmRecord]) -> Vec<RiskBucket> {
    RiskLevel::all()
        .iter()
        .map(|&level| RiskBucket {
            level,
            drought: count(subset, |r| r.drought_risk == level),
            flood: count(subset, |r| r.flood_risk == level),
        })
        .collect()
}

/// Farm count per supplier tier, most common first.
///
/// Tiers without farms in the subset are omitted.
#[must_use]
pub fn tier_series(subset: &[&FarmRecord]) -> Vec<TierCount> {
    let mut tiers: Vec<TierCount> = SupplierTier::all()
        .iter()
        .map(|&tier| TierCount {
            tier,
            count: count(subset, |r| r.supplier_tier == tier),
        })
        .filter(|t| t.count > 0)
        .collect();
    tiers.sort_by(|a, b| b.count.cmp(&a.count));
    tiers
}

#[must_use]
pub fn scheme_enrollment(subset: &[&FarmRecord]) -> SchemeEnrollment {
    SchemeEnrollment {
        sfi: count(subset, |r| r.sfi_enrolled),
        cs: count(subset, |r| r.cs_enrolled),
        both: count(subset, |r| r.in_both_schemes()),
    }
}

/// Projects the first `limit` records of the subset for the table view.
#[must_use]
pub fn farm_table(subset: &[&FarmRecord], limit: usize) -> FarmTable {
    if subset.is_empty() {
        return FarmTable::NoMatches;
    }

    FarmTable::Rows {
        rows: subset
            .iter()
            .take(limit)
            .map(|r| FarmTableRow {
                name: r.name.clone(),
                id: r.id.clone(),
                region: r.region,
                supplier_tier: r.supplier_tier,
                size: r.size,
                overall_score: r.overall_score,
                tnfd: r.tnfd_compliant.into(),
                drought_risk: r.drought_risk,
                flood_risk: r.flood_risk,
            })
            .collect(),
    }
}

fn len(subset: &[&FarmRecord]) -> u64 {
    subset.len() as u64
}

fn count(subset: &[&FarmRecord], predicate: impl Fn(&FarmRecord) -> bool) -> u64 {
    subset.iter().filter(|r| predicate(r)).count() as u64
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: u64, n: u64) -> f64 {
    if n == 0 {
        0.0
    } else {
        100.0 * part as f64 / n as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(subset: &[&FarmRecord], value: impl Fn(&FarmRecord) -> f64) -> f64 {
    if subset.is_empty() {
        0.0
    } else {
        subset.iter().map(|r| value(r)).sum::<f64>() / subset.len() as f64
    }
}
