#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and aggregate result types for the farm dashboard.
//!
//! [`FilterCriteria`] is the input to the filter engine; [`DashboardSummary`]
//! is the single structured result of one recomputation. Everything in the
//! summary is derived from the filtered subset alone, so two summaries built
//! from the same store and criteria are always equal.

use std::fmt;
use std::str::FromStr;

use farm_monitor_farm_models::{Region, RiskLevel, SupplierTier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display};

/// Selector value that means "no constraint".
pub const ALL: &str = "all";

/// Default number of rows in the farm table.
pub const DEFAULT_TABLE_ROW_LIMIT: usize = 50;

/// A dropdown selection over an enum.
///
/// Values that do not name a variant are kept as [`Selector::Unrecognized`]
/// rather than rejected; the filter engine treats them as matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    /// No constraint.
    All,
    /// Only records with this value.
    Only(T),
    /// A value outside the enum.
    Unrecognized(String),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: FromStr> Selector<T> {
    /// Parses raw selector input. Empty input and `"all"` (any case) mean
    /// [`Selector::All`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            return Self::All;
        }
        raw.parse()
            .map_or_else(|_| Self::Unrecognized(raw.to_string()), Self::Only)
    }

    /// Like [`Selector::parse`], treating a missing value as
    /// [`Selector::All`].
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map_or(Self::All, Self::parse)
    }
}

impl<T> Selector<T> {
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T> From<T> for Selector<T> {
    fn from(value: T) -> Self {
        Self::Only(value)
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => value.fmt(f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl<T: fmt::Display> Serialize for Selector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Selector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// The four dashboard filter inputs.
///
/// The default value passes every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against farm name or id.
    pub search: String,
    pub region: Selector<Region>,
    pub tier: Selector<SupplierTier>,
    /// Matches farms whose drought OR flood risk is at this level.
    pub risk: Selector<RiskLevel>,
}

impl FilterCriteria {
    /// Builds criteria from raw, optional input values.
    #[must_use]
    pub fn from_raw(
        search: Option<&str>,
        region: Option<&str>,
        tier: Option<&str>,
        risk: Option<&str>,
    ) -> Self {
        Self {
            search: search.unwrap_or_default().to_string(),
            region: Selector::from_optional(region),
            tier: Selector::from_optional(tier),
            risk: Selector::from_optional(risk),
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<Selector<Region>>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<Selector<SupplierTier>>) -> Self {
        self.tier = tier.into();
        self
    }

    #[must_use]
    pub fn with_risk(mut self, risk: impl Into<Selector<RiskLevel>>) -> Self {
        self.risk = risk.into();
        self
    }

    /// Returns `true` if no filter is active.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.region.is_all()
            && self.tier.is_all()
            && self.risk.is_all()
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "search='{}' region={} tier={} risk={}",
            self.search, self.region, self.tier, self.risk
        )
    }
}

/// Tunables for [`DashboardSummary`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOptions {
    /// Maximum number of farm table rows.
    pub table_row_limit: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            table_row_limit: DEFAULT_TABLE_ROW_LIMIT,
        }
    }
}

/// Headline portfolio figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCards {
    pub total_farms: u64,
    pub tnfd_compliance_pct: f64,
    /// Mean overall score.
    pub avg_score: f64,
    /// Farms with drought or flood risk `High`.
    pub high_risk_count: u64,
    pub high_risk_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandMetrics {
    /// Sum of `size * naturalHabitatPct / 100`.
    pub natural_habitat_area_ha: f64,
    /// Share of farms with soil health of at least 4.0.
    pub soil_health_compliance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterMetrics {
    pub avg_water_efficiency: f64,
    /// Share of farms with water efficiency of at least 85%.
    pub water_compliance_pct: f64,
    /// Same value as [`MetricCards::high_risk_pct`], shown on the water panel.
    pub risk_exposure_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodiversityMetrics {
    pub avg_biodiversity: f64,
}

/// Per-region aggregate. Only regions present in the subset appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPoint {
    pub region: Region,
    pub farms: u64,
    pub avg_score: f64,
    pub tnfd_compliance_pct: f64,
    /// Sum of annual milk volume in liters.
    pub total_milk_volume: u64,
}

/// Drought and flood counts for one risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBucket {
    pub level: RiskLevel,
    pub drought: u64,
    pub flood: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCount {
    pub tier: SupplierTier,
    pub count: u64,
}

/// Scheme enrollment counts. `sfi` and `cs` both include farms counted in
/// `both`, so the three values do not sum to the subset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeEnrollment {
    pub sfi: u64,
    pub cs: u64,
    pub both: u64,
}

/// TNFD compliance symbol shown in the farm table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
pub enum TnfdMark {
    #[serde(rename = "✓")]
    #[strum(serialize = "✓")]
    Compliant,
    #[serde(rename = "✗")]
    #[strum(serialize = "✗")]
    NonCompliant,
}

impl From<bool> for TnfdMark {
    fn from(compliant: bool) -> Self {
        if compliant {
            Self::Compliant
        } else {
            Self::NonCompliant
        }
    }
}

/// Projection of a farm record for the table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmTableRow {
    pub name: String,
    pub id: String,
    pub region: Region,
    pub supplier_tier: SupplierTier,
    pub size: u32,
    pub overall_score: u8,
    pub tnfd: TnfdMark,
    pub drought_risk: RiskLevel,
    pub flood_risk: RiskLevel,
}

/// The farm table, or an explicit marker when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FarmTable {
    /// Up to the configured row limit, in store order.
    Rows { rows: Vec<FarmTableRow> },
    /// The filtered subset is empty.
    NoMatches,
}

impl FarmTable {
    /// Rows in the table (empty for [`FarmTable::NoMatches`]).
    #[must_use]
    pub fn rows(&self) -> &[FarmTableRow] {
        match self {
            Self::Rows { rows } => rows,
            Self::NoMatches => &[],
        }
    }
}

/// Counts behind the "Showing n of total farms" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub showing: u64,
    pub total: u64,
    pub tnfd_compliant: u64,
    pub sfi_enrolled: u64,
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} farms", self.showing, self.total)
    }
}

/// Everything derived from one filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub cards: MetricCards,
    pub land: LandMetrics,
    pub water: WaterMetrics,
    pub biodiversity: BiodiversityMetrics,
    pub regional: Vec<RegionalPoint>,
    /// Always three buckets: Low, Medium, High.
    pub risk: Vec<RiskBucket>,
    pub tiers: Vec<TierCount>,
    pub schemes: SchemeEnrollment,
    pub table: FarmTable,
    pub filter_summary: FilterSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_all_and_values() {
        assert_eq!(Selector::<Region>::parse("all"), Selector::All);
        assert_eq!(Selector::<Region>::parse("ALL"), Selector::All);
        assert_eq!(Selector::<Region>::parse(""), Selector::All);
        assert_eq!(
            Selector::<Region>::parse("South West"),
            Selector::Only(Region::SouthWest)
        );
        assert_eq!(
            Selector::<Region>::parse("Atlantis"),
            Selector::Unrecognized("Atlantis".to_string())
        );
        assert_eq!(Selector::<RiskLevel>::from_optional(None), Selector::All);
    }

    #[test]
    fn selector_serializes_as_string() {
        let criteria = FilterCriteria::default()
            .with_region(Region::EastAnglia)
            .with_risk(Selector::Unrecognized("Severe".to_string()));
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["region"], "East Anglia");
        assert_eq!(json["tier"], "all");
        assert_eq!(json["risk"], "Severe");

        let back: FilterCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, criteria);
    }

    #[test]
    fn criteria_defaults_when_fields_missing() {
        let criteria: FilterCriteria = serde_json::from_str(r#"{"tier": "Gold"}"#).unwrap();
        assert_eq!(criteria.tier, Selector::Only(SupplierTier::Gold));
        assert!(criteria.region.is_all());
        assert!(criteria.search.is_empty());
        assert!(!criteria.is_unfiltered());
        assert!(FilterCriteria::default().is_unfiltered());
    }

    #[test]
    fn filter_summary_headline() {
        let summary = FilterSummary {
            showing: 12,
            total: 270,
            tnfd_compliant: 10,
            sfi_enrolled: 7,
        };
        assert_eq!(summary.to_string(), "Showing 12 of 270 farms");
    }

    #[test]
    fn tnfd_mark_symbols() {
        assert_eq!(TnfdMark::from(true).to_string(), "✓");
        assert_eq!(TnfdMark::from(false).to_string(), "✗");
        assert_eq!(serde_json::to_value(TnfdMark::Compliant).unwrap(), "✓");
    }
}
