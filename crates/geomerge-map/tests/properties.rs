use std::collections::BTreeSet;

use geomerge_map::match_and_merge;
use geomerge_model::{
    CellValue, ColumnMapping, KeyField, KeyThresholds, MatchOptions, MatchStrategy, Table,
};
use proptest::prelude::*;

type KeyRow = (String, String, String);

fn key_rows() -> impl Strategy<Value = Vec<KeyRow>> {
    prop::collection::vec(("[ab]{1,3}", "[ab]{1,3}", "[ab ]{0,5}"), 0..6)
}

fn table(rows: &[KeyRow]) -> Table {
    Table::from_records(
        ["region", "zone", "woreda", "row"],
        rows.iter().enumerate().map(|(idx, (r, z, w))| {
            vec![
                CellValue::from(r.as_str()),
                CellValue::from(z.as_str()),
                CellValue::from(w.as_str()),
                CellValue::Integer(idx as i64),
            ]
        }),
    )
    .expect("table")
}

fn mapping() -> ColumnMapping {
    ColumnMapping::new()
        .with(KeyField::Region, "region")
        .with(KeyField::Zone, "zone")
        .with(KeyField::Woreda, "woreda")
}

fn strategy() -> impl Strategy<Value = MatchStrategy> {
    prop_oneof![Just(MatchStrategy::FirstFit), Just(MatchStrategy::BestFit)]
}

proptest! {
    #[test]
    fn every_row_lands_in_exactly_one_partition(
        a_rows in key_rows(),
        b_rows in key_rows(),
        threshold in 0u8..=100,
        strategy in strategy(),
    ) {
        let a = table(&a_rows);
        let b = table(&b_rows);
        let thresholds = KeyThresholds::new(threshold, threshold, threshold).unwrap();
        let options = MatchOptions::new(thresholds).with_strategy(strategy);
        let result = match_and_merge(&a, &b, &mapping(), &mapping(), &options).unwrap();
        let outcome = &result.outcome;

        let matched_a: BTreeSet<usize> = outcome.pairs.iter().map(|p| p.a_index).collect();
        let claimed_b: BTreeSet<usize> = outcome.pairs.iter().map(|p| p.b_index).collect();
        prop_assert_eq!(matched_a.len(), outcome.pairs.len());
        prop_assert_eq!(claimed_b.len(), outcome.pairs.len());

        for idx in 0..a.len() {
            let unmatched = outcome.unmatched_a.contains(&idx);
            prop_assert!(matched_a.contains(&idx) != unmatched);
        }
        for idx in 0..b.len() {
            let unmatched = outcome.unmatched_b.contains(&idx);
            prop_assert!(claimed_b.contains(&idx) != unmatched);
        }

        prop_assert_eq!(result.merged.len(), outcome.pairs.len());
        prop_assert_eq!(result.unmatched_a.len(), outcome.unmatched_a.len());
        prop_assert_eq!(result.unmatched_b.len(), outcome.unmatched_b.len());
    }

    #[test]
    fn matching_is_deterministic(
        a_rows in key_rows(),
        b_rows in key_rows(),
        threshold in 0u8..=100,
    ) {
        let a = table(&a_rows);
        let b = table(&b_rows);
        let thresholds = KeyThresholds::new(threshold, threshold, threshold).unwrap();
        let options = MatchOptions::new(thresholds);
        let first = match_and_merge(&a, &b, &mapping(), &mapping(), &options).unwrap();
        let second = match_and_merge(&a, &b, &mapping(), &mapping(), &options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_pair_meets_all_thresholds(
        a_rows in key_rows(),
        b_rows in key_rows(),
        threshold in 0u8..=100,
    ) {
        let a = table(&a_rows);
        let b = table(&b_rows);
        let thresholds = KeyThresholds::new(threshold, threshold, threshold).unwrap();
        let options = MatchOptions::new(thresholds);
        let result = match_and_merge(&a, &b, &mapping(), &mapping(), &options).unwrap();
        for pair in &result.outcome.pairs {
            prop_assert!(pair.scores.meets(&thresholds));
        }
    }
}
