#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Supplier farm record types and classification enums.
//!
//! This crate defines the canonical [`FarmRecord`] shape shared by the
//! store, the analytics engine, and the API. Enum variants serialize to the
//! human-readable names shown in the dashboard selectors (e.g.
//! `"South West"`, `"Non-NVZ"`), which are also the values accepted when
//! parsing filter input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the eight UK regions a supplier farm can belong to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Region {
    #[serde(rename = "South West")]
    #[strum(serialize = "South West")]
    SouthWest,
    #[serde(rename = "South East")]
    #[strum(serialize = "South East")]
    SouthEast,
    #[serde(rename = "East Midlands")]
    #[strum(serialize = "East Midlands")]
    EastMidlands,
    #[serde(rename = "West Midlands")]
    #[strum(serialize = "West Midlands")]
    WestMidlands,
    #[serde(rename = "North West")]
    #[strum(serialize = "North West")]
    NorthWest,
    Yorkshire,
    #[serde(rename = "North East")]
    #[strum(serialize = "North East")]
    NorthEast,
    #[serde(rename = "East Anglia")]
    #[strum(serialize = "East Anglia")]
    EastAnglia,
}

impl Region {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::SouthWest,
            Self::SouthEast,
            Self::EastMidlands,
            Self::WestMidlands,
            Self::NorthWest,
            Self::Yorkshire,
            Self::NorthEast,
            Self::EastAnglia,
        ]
    }
}

/// Supplier classification of a farm.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SupplierTier {
    Gold,
    Silver,
    Bronze,
}

impl SupplierTier {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gold, Self::Silver, Self::Bronze]
    }
}

/// Nitrate Vulnerable Zone designation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum NvzStatus {
    #[serde(rename = "NVZ")]
    #[strum(serialize = "NVZ")]
    Nvz,
    #[serde(rename = "Non-NVZ")]
    #[strum(serialize = "Non-NVZ")]
    NonNvz,
}

impl NvzStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Nvz, Self::NonNvz]
    }
}

/// Hazard level used for both drought and flood risk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// A single supplier farm.
///
/// Records are produced once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    /// Unique identifier in the form `FARM_NNN`.
    pub id: String,
    /// Display name (e.g. "Valley Dairy").
    pub name: String,
    pub region: Region,
    /// Farm area in hectares.
    pub size: u32,
    pub herd_size: u32,
    pub supplier_tier: SupplierTier,
    pub nvz_status: NvzStatus,
    /// Share of the farm area kept as natural habitat, in percent.
    pub natural_habitat_pct: u8,
    /// Soil health index (3.0-6.0, one decimal place).
    pub soil_health: f64,
    pub water_efficiency_pct: u8,
    pub biodiversity_score: u8,
    pub nitrogen_efficiency_pct: u8,
    pub phosphorus_efficiency_pct: u8,
    pub drought_risk: RiskLevel,
    pub flood_risk: RiskLevel,
    /// Whether the farm meets TNFD disclosure requirements.
    pub tnfd_compliant: bool,
    /// Enrolled in the Sustainable Farming Incentive.
    pub sfi_enrolled: bool,
    /// Enrolled in Countryside Stewardship.
    pub cs_enrolled: bool,
    pub overall_score: u8,
    /// Annual milk volume in liters.
    pub milk_volume: u64,
    pub sustainability_premium: u32,
    pub last_updated: NaiveDate,
}

impl FarmRecord {
    /// Returns `true` if either the drought or the flood hazard is at
    /// `level`.
    #[must_use]
    pub fn has_risk(&self, level: RiskLevel) -> bool {
        self.drought_risk == level || self.flood_risk == level
    }

    /// Returns `true` if either hazard is [`RiskLevel::High`].
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.has_risk(RiskLevel::High)
    }

    /// Natural habitat area in hectares (`size * natural_habitat_pct / 100`).
    #[must_use]
    pub fn natural_habitat_area_ha(&self) -> f64 {
        f64::from(self.size) * f64::from(self.natural_habitat_pct) / 100.0
    }

    /// Returns `true` if the farm is enrolled in both SFI and CS.
    #[must_use]
    pub const fn in_both_schemes(&self) -> bool {
        self.sfi_enrolled && self.cs_enrolled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FarmRecord {
        FarmRecord {
            id: "FARM_001".to_string(),
            name: "Oak Dairy".to_string(),
            region: Region::SouthWest,
            size: 200,
            herd_size: 150,
            supplier_tier: SupplierTier::Gold,
            nvz_status: NvzStatus::NonNvz,
            natural_habitat_pct: 15,
            soil_health: 4.2,
            water_efficiency_pct: 88,
            biodiversity_score: 70,
            nitrogen_efficiency_pct: 60,
            phosphorus_efficiency_pct: 70,
            drought_risk: RiskLevel::High,
            flood_risk: RiskLevel::Low,
            tnfd_compliant: true,
            sfi_enrolled: true,
            cs_enrolled: false,
            overall_score: 75,
            milk_volume: 1_200_000,
            sustainability_premium: 2500,
            last_updated: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn region_display_names_parse_back() {
        for region in Region::all() {
            let parsed: Region = region.to_string().parse().unwrap();
            assert_eq!(parsed, *region);
        }
        assert_eq!(Region::SouthWest.to_string(), "South West");
        assert_eq!(Region::Yorkshire.as_ref(), "Yorkshire");
    }

    #[test]
    fn selector_names_are_case_insensitive() {
        assert_eq!("south west".parse::<Region>().unwrap(), Region::SouthWest);
        assert_eq!("GOLD".parse::<SupplierTier>().unwrap(), SupplierTier::Gold);
        assert_eq!("non-nvz".parse::<NvzStatus>().unwrap(), NvzStatus::NonNvz);
        assert!("Scotland".parse::<Region>().is_err());
    }

    #[test]
    fn serializes_human_readable_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["region"], "South West");
        assert_eq!(json["nvzStatus"], "Non-NVZ");
        assert_eq!(json["supplierTier"], "Gold");
        assert_eq!(json["lastUpdated"], "2024-05-01");
    }

    #[test]
    fn risk_matches_either_hazard() {
        let farm = record();
        assert!(farm.has_risk(RiskLevel::High));
        assert!(farm.has_risk(RiskLevel::Low));
        assert!(!farm.has_risk(RiskLevel::Medium));
        assert!(farm.is_high_risk());
    }

    #[test]
    fn natural_habitat_area_uses_percentage_of_size() {
        assert!((record().natural_habitat_area_ha() - 30.0).abs() < f64::EPSILON);
    }
}
