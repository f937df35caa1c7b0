//! Seeded synthetic farm generator.
//!
//! Produces the demo portfolio: `FARM_001`, `FARM_002`, ... with every
//! attribute drawn uniformly from its schema range. The same seed and
//! reference date always produce the same records.

use chrono::{Days, NaiveDate, Utc};
use farm_monitor_farm_models::{FarmRecord, NvzStatus, Region, RiskLevel, SupplierTier};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{FarmSource, StoreError};

const NAME_PREFIXES: &[&str] = &[
    "Green", "Hill", "Valley", "Brook", "Meadow", "Field", "Oak", "Manor",
];
const NAME_SUFFIXES: &[&str] = &["Farm", "Dairy", "Estate", "Holdings"];

/// Generates `count` farms from a fixed seed.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSource {
    count: usize,
    seed: u64,
    today: NaiveDate,
}

impl SyntheticSource {
    /// Creates a generator whose `lastUpdated` dates fall within the 30 days
    /// before `today`.
    #[must_use]
    pub const fn new(count: usize, seed: u64, today: NaiveDate) -> Self {
        Self { count, seed, today }
    }

    /// Creates a generator with a random seed, dated today.
    #[must_use]
    pub fn with_random_seed(count: usize) -> Self {
        Self::new(count, rand::random(), Utc::now().date_naive())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl FarmSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("synthetic generator (seed {})", self.seed)
    }

    fn load(&self) -> Result<Vec<FarmRecord>, StoreError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        Ok((1..=self.count)
            .map(|n| generate_farm(&mut rng, n, self.today))
            .collect())
    }
}

fn pick<T: Copy>(rng: &mut impl Rng, values: &[T]) -> T {
    values[rng.random_range(0..values.len())]
}

fn generate_farm(rng: &mut impl Rng, n: usize, today: NaiveDate) -> FarmRecord {
    let name = format!("{} {}", pick(rng, NAME_PREFIXES), pick(rng, NAME_SUFFIXES));
    let soil_health = (30.0 + rng.random::<f64>() * 30.0).round() / 10.0;
    let sustainability_premium = if rng.random_bool(0.7) {
        rng.random_range(0..5000)
    } else {
        0
    };
    let age = Days::new(rng.random_range(0..30));

    FarmRecord {
        id: format!("FARM_{n:03}"),
        name,
        region: pick(rng, Region::all()),
        size: rng.random_range(50..450),
        herd_size: rng.random_range(80..380),
        supplier_tier: pick(rng, SupplierTier::all()),
        nvz_status: pick(rng, NvzStatus::all()),
        natural_habitat_pct: rng.random_range(5..30),
        soil_health,
        water_efficiency_pct: rng.random_range(70..95),
        biodiversity_score: rng.random_range(40..90),
        nitrogen_efficiency_pct: rng.random_range(45..85),
        phosphorus_efficiency_pct: rng.random_range(50..85),
        drought_risk: pick(rng, RiskLevel::all()),
        flood_risk: pick(rng, RiskLevel::all()),
        tnfd_compliant: rng.random_bool(0.85),
        sfi_enrolled: rng.random_bool(0.6),
        cs_enrolled: rng.random_bool(0.4),
        overall_score: rng.random_range(50..90),
        milk_volume: rng.random_range(500_000..2_500_000),
        sustainability_premium,
        last_updated: today.checked_sub_days(age).unwrap_or(today),
    }
}
