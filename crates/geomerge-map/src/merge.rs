//! Assembling result tables from a match outcome.

use geomerge_model::{ColumnMapping, Row, Table};

use crate::matcher::MatchOutcome;

/// Merged and leftover tables of one matching run.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// One row per matched pair: every column of A, then B's non-key columns.
    pub merged: Table,
    /// Rows of A without a partner, original columns and values.
    pub unmatched_a: Table,
    /// Rows of B never claimed, original columns and values.
    pub unmatched_b: Table,
    pub outcome: MatchOutcome,
}

/// Builds the result tables from the original (not normalized) tables.
///
/// B's mapped key columns are left out of merged rows. A B column sharing a
/// name with an A column overwrites A's value in that row but keeps A's
/// column position. Indices that fall outside their table are skipped.
pub fn assemble(
    table_a: &Table,
    table_b: &Table,
    mapping_b: &ColumnMapping,
    outcome: MatchOutcome,
) -> MergeResult {
    let b_extra: Vec<&str> = table_b
        .columns
        .iter()
        .map(String::as_str)
        .filter(|column| !mapping_b.maps_column(column))
        .collect();

    let mut merged_columns = table_a.columns.clone();
    for column in &b_extra {
        if !table_a.has_column(column) {
            merged_columns.push((*column).to_string());
        }
    }
    let mut merged = Table {
        columns: merged_columns,
        rows: Vec::with_capacity(outcome.pairs.len()),
    };

    for pair in &outcome.pairs {
        let Some(a_row) = table_a.rows.get(pair.a_index) else {
            continue;
        };
        if pair.b_index >= table_b.len() {
            continue;
        }
        let mut row = a_row.clone();
        for column in &b_extra {
            row.insert(*column, table_b.value(pair.b_index, column).clone());
        }
        merged.push_row(row);
    }

    let unmatched_a = select_rows(table_a, &outcome.unmatched_a);
    let unmatched_b = select_rows(table_b, &outcome.unmatched_b);

    MergeResult {
        merged,
        unmatched_a,
        unmatched_b,
        outcome,
    }
}

fn select_rows(table: &Table, indices: &[usize]) -> Table {
    let mut out = table.empty_like();
    out.rows = indices
        .iter()
        .filter_map(|&idx| table.rows.get(idx))
        .cloned()
        .collect::<Vec<Row>>();
    out
}

#[cfg(test)]
mod tests {
    use geomerge_model::{CellValue, KeyField};

    use super::*;
    use crate::matcher::{KeyScores, MatchedPair};

    fn perfect() -> KeyScores {
        KeyScores {
            region: 100.0,
            zone: 100.0,
            woreda: 100.0,
        }
    }

    #[test]
    fn b_columns_overwrite_same_named_a_columns() {
        let a = Table::from_records(
            ["Region", "Zone", "Woreda", "source"],
            vec![vec![
                CellValue::from("Afar"),
                CellValue::from("Z1"),
                CellValue::from("W1"),
                CellValue::from("a"),
            ]],
        )
        .unwrap();
        let b = Table::from_records(
            ["region", "zone", "woreda", "source", "count"],
            vec![vec![
                CellValue::from("afar"),
                CellValue::from("z1"),
                CellValue::from("w1"),
                CellValue::from("b"),
                CellValue::Integer(3),
            ]],
        )
        .unwrap();
        let mapping_b = ColumnMapping::new()
            .with(KeyField::Region, "region")
            .with(KeyField::Zone, "zone")
            .with(KeyField::Woreda, "woreda");
        let outcome = MatchOutcome {
            pairs: vec![MatchedPair {
                a_index: 0,
                b_index: 0,
                scores: perfect(),
            }],
            unmatched_a: vec![],
            unmatched_b: vec![],
        };

        let result = assemble(&a, &b, &mapping_b, outcome);
        assert_eq!(
            result.merged.columns,
            vec!["Region", "Zone", "Woreda", "source", "count"]
        );
        assert_eq!(result.merged.value(0, "source"), &CellValue::from("b"));
        assert_eq!(result.merged.value(0, "Region"), &CellValue::from("Afar"));
        assert!(result.merged.rows[0].get("region").is_none());
        assert_eq!(result.unmatched_a.columns, a.columns);
        assert!(result.unmatched_b.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let a = Table::from_records(
            ["region", "zone", "woreda"],
            vec![vec![
                CellValue::from("Afar"),
                CellValue::from("Z1"),
                CellValue::from("W1"),
            ]],
        )
        .unwrap();
        let mapping = ColumnMapping::new()
            .with(KeyField::Region, "region")
            .with(KeyField::Zone, "zone")
            .with(KeyField::Woreda, "woreda");
        let outcome = MatchOutcome {
            pairs: vec![
                MatchedPair {
                    a_index: 0,
                    b_index: 4,
                    scores: perfect(),
                },
                MatchedPair {
                    a_index: 9,
                    b_index: 0,
                    scores: perfect(),
                },
            ],
            unmatched_a: vec![0, 5],
            unmatched_b: vec![7],
        };

        let result = assemble(&a, &a, &mapping, outcome);
        assert!(result.merged.is_empty());
        assert_eq!(result.unmatched_a.len(), 1);
        assert!(result.unmatched_b.is_empty());
    }
}
