//! Filter engine.
//!
//! Search, region and tier constraints are combined with AND. The risk
//! constraint is itself an OR over the two hazards: a farm passes `risk =
//! High` if its drought risk OR its flood risk is `High`.

use farm_monitor_analytics_models::{FilterCriteria, Selector};
use farm_monitor_farm_models::FarmRecord;

/// Returns the records matching `criteria`, in their original order.
#[must_use]
pub fn apply<'a>(records: &'a [FarmRecord], criteria: &FilterCriteria) -> Vec<&'a FarmRecord> {
    warn_unrecognized("region", &criteria.region);
    warn_unrecognized("tier", &criteria.tier);
    warn_unrecognized("risk", &criteria.risk);

    let needle = criteria.search.to_lowercase();

    records
        .iter()
        .filter(|record| matches(record, criteria, &needle))
        .collect()
}

/// Returns `true` if `record` passes every active constraint.
///
/// `needle` is the lowercased search text.
#[must_use]
pub fn matches(record: &FarmRecord, criteria: &FilterCriteria, needle: &str) -> bool {
    matches_search(record, needle)
        && admits(&criteria.region, |region| record.region == *region)
        && admits(&criteria.tier, |tier| record.supplier_tier == *tier)
        && admits(&criteria.risk, |level| record.has_risk(*level))
}

fn matches_search(record: &FarmRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.name.to_lowercase().contains(needle)
        || record.id.to_lowercase().contains(needle)
}

fn admits<T>(selector: &Selector<T>, predicate: impl Fn(&T) -> bool) -> bool {
    match selector {
        Selector::All => true,
        Selector::Only(value) => predicate(value),
        Selector::Unrecognized(_) => false,
    }
}

fn warn_unrecognized<T>(field: &str, selector: &Selector<T>) {
    if let Selector::Unrecognized(raw) = selector {
        log::warn!("Unrecognized {field} value '{raw}', no farms will match");
    }
}

#[cfg(test)]
mod tests {
    use farm_monitor_farm_models::{Region, RiskLevel, SupplierTier};
    use proptest::prelude::*;

    use super::*;
    use crate::testing::farm;

    fn arb_record() -> impl Strategy<Value = FarmRecord> {
        (
            1usize..999,
            0..Region::all().len(),
            0..3usize,
            0..3usize,
            0..3usize,
            prop::sample::select(vec!["Green Farm", "Oak Estate", "Brook Holdings"]),
        )
            .prop_map(|(n, region, tier, drought, flood, name)| {
                let mut record = farm(n);
                record.name = name.to_string();
                record.region = Region::all()[region];
                record.supplier_tier = SupplierTier::all()[tier];
                record.drought_risk = RiskLevel::all()[drought];
                record.flood_risk = RiskLevel::all()[flood];
                record
            })
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            prop::sample::select(vec!["", "farm", "OAK", "_00", "zzz"]),
            prop::option::of(0..Region::all().len()),
            prop::option::of(0..3usize),
            prop::option::of(0..3usize),
        )
            .prop_map(|(search, region, tier, risk)| FilterCriteria {
                search: search.to_string(),
                region: region.map_or(Selector::All, |i| Selector::Only(Region::all()[i])),
                tier: tier.map_or(Selector::All, |i| Selector::Only(SupplierTier::all()[i])),
                risk: risk.map_or(Selector::All, |i| Selector::Only(RiskLevel::all()[i])),
            })
    }

    proptest! {
        #[test]
        fn output_is_ordered_subset(
            records in prop::collection::vec(arb_record(), 0..40),
            criteria in arb_criteria(),
        ) {
            let subset = apply(&records, &criteria);
            prop_assert!(subset.len() <= records.len());

            // Every output record is one of the inputs, and positions only
            // move forward.
            let mut cursor = 0;
            for record in subset {
                let offset = records[cursor..]
                    .iter()
                    .position(|r| std::ptr::eq(r, record));
                prop_assert!(offset.is_some());
                cursor += offset.unwrap() + 1;
            }
        }

        #[test]
        fn risk_is_disjunctive_over_hazards(
            records in prop::collection::vec(arb_record(), 0..40),
            level in 0..3usize,
        ) {
            let level = RiskLevel::all()[level];
            let criteria = FilterCriteria::default().with_risk(level);
            let subset = apply(&records, &criteria);

            let expected = records
                .iter()
                .filter(|r| r.drought_risk == level || r.flood_risk == level)
                .count();
            prop_assert_eq!(subset.len(), expected);
        }

        #[test]
        fn default_criteria_passes_everything(
            records in prop::collection::vec(arb_record(), 0..40),
        ) {
            prop_assert_eq!(apply(&records, &FilterCriteria::default()).len(), records.len());
        }
    }

    #[test]
    fn drought_only_high_passes_with_region_and_tier() {
        let mut record = farm(1);
        record.region = Region::SouthWest;
        record.supplier_tier = SupplierTier::Gold;
        record.drought_risk = RiskLevel::High;
        record.flood_risk = RiskLevel::Low;

        let criteria = FilterCriteria::default()
            .with_region(Region::SouthWest)
            .with_tier(SupplierTier::Gold)
            .with_risk(RiskLevel::High);

        assert_eq!(apply(std::slice::from_ref(&record), &criteria).len(), 1);
    }

    #[test]
    fn high_risk_excludes_farms_low_on_both() {
        let mut low = farm(1);
        low.drought_risk = RiskLevel::Low;
        low.flood_risk = RiskLevel::Low;
        let mut flood = farm(2);
        flood.flood_risk = RiskLevel::High;

        let records = vec![low, flood];
        let subset = apply(&records, &FilterCriteria::default().with_risk(RiskLevel::High));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "FARM_002");
    }

    #[test]
    fn region_and_tier_are_conjunctive() {
        let mut gold_sw = farm(1);
        gold_sw.supplier_tier = SupplierTier::Gold;
        let mut gold_ne = farm(2);
        gold_ne.supplier_tier = SupplierTier::Gold;
        gold_ne.region = Region::NorthEast;
        let silver_sw = farm(3);

        let records = vec![gold_sw, gold_ne, silver_sw];
        let criteria = FilterCriteria::default()
            .with_tier(SupplierTier::Gold)
            .with_region(Region::SouthWest);
        let subset = apply(&records, &criteria);

        assert_eq!(subset.len(), 1);
        assert!(
            subset
                .iter()
                .all(|r| r.supplier_tier == SupplierTier::Gold && r.region == Region::SouthWest)
        );
    }

    #[test]
    fn search_matches_name_or_id_case_insensitively() {
        let mut oak = farm(1);
        oak.name = "Oak Estate".to_string();
        let mut brook = farm(12);
        brook.name = "Brook Farm".to_string();
        let records = vec![oak, brook];

        let by_name = apply(&records, &FilterCriteria::default().with_search("oAK"));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "FARM_001");

        let by_id = apply(&records, &FilterCriteria::default().with_search("farm_012"));
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Brook Farm");

        let both = apply(&records, &FilterCriteria::default().with_search("farm"));
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn unrecognized_selector_matches_nothing() {
        let records = vec![farm(1), farm(2)];
        let criteria =
            FilterCriteria::default().with_tier(Selector::Unrecognized("Platinum".to_string()));
        assert!(apply(&records, &criteria).is_empty());
    }
}
