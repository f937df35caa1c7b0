//! Display-only land and biodiversity figures.
//!
//! Peatland exposure, species richness and habitat connectivity cannot be
//! derived from farm records. They are filled in at presentation time and
//! never enter a [`farm_monitor_analytics_models::DashboardSummary`].

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationValues {
    pub peatland_exposure_ha: u32,
    pub species_richness: u32,
    pub habitat_connectivity_pct: u32,
}

/// Supplies [`DecorationValues`] for one render.
pub trait Decoration: Send + Sync {
    fn values(&self) -> DecorationValues;
}

/// Always returns the same mid-range values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDecoration;

impl Decoration for StaticDecoration {
    fn values(&self) -> DecorationValues {
        DecorationValues {
            peatland_exposure_ha: 50,
            species_richness: 27,
            habitat_connectivity_pct: 80,
        }
    }
}

/// Draws fresh values on every render.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDecoration;

impl Decoration for RandomDecoration {
    fn values(&self) -> DecorationValues {
        let mut rng = rand::rng();
        DecorationValues {
            peatland_exposure_ha: rng.random_range(20..80),
            species_richness: rng.random_range(20..35),
            habitat_connectivity_pct: rng.random_range(65..95),
        }
    }
}
