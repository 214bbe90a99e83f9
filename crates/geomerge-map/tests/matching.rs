use geomerge_map::{MapError, match_and_merge, resolve_columns};
use geomerge_model::{
    CellValue, ColumnMapping, KeyField, KeyNormalization, KeyThresholds, MatchOptions, Table,
};

fn canonical_mapping() -> ColumnMapping {
    ColumnMapping::new()
        .with(KeyField::Region, "region")
        .with(KeyField::Zone, "zone")
        .with(KeyField::Woreda, "woreda")
}

fn text_row(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

fn with_id(values: &[&str], id: i64) -> Vec<CellValue> {
    let mut row = text_row(values);
    row.push(CellValue::Integer(id));
    row
}

fn dataset_a() -> Table {
    Table::from_records(
        ["region", "zone", "woreda", "val"],
        vec![vec![
            CellValue::from("Addis Ababa"),
            CellValue::from("Zone1"),
            CellValue::from("W1"),
            CellValue::Integer(10),
        ]],
    )
    .expect("table a")
}

fn dataset_b(region: &str) -> Table {
    Table::from_records(
        ["region", "zone", "woreda", "note"],
        vec![vec![
            CellValue::from(region),
            CellValue::from("zone 1"),
            CellValue::from("w1 "),
            CellValue::from("ok"),
        ]],
    )
    .expect("table b")
}

#[test]
fn matches_rows_differing_in_case_and_spacing() {
    let a = dataset_a();
    let b = dataset_b("addis ababa");
    let result = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &canonical_mapping(),
        &MatchOptions::default(),
    )
    .expect("match");

    assert_eq!(
        result.merged.columns,
        vec!["region", "zone", "woreda", "val", "note"]
    );
    assert_eq!(result.merged.len(), 1);
    assert_eq!(
        result.merged.value(0, "region"),
        &CellValue::from("Addis Ababa")
    );
    assert_eq!(result.merged.value(0, "zone"), &CellValue::from("Zone1"));
    assert_eq!(result.merged.value(0, "woreda"), &CellValue::from("W1"));
    assert_eq!(result.merged.value(0, "val"), &CellValue::Integer(10));
    assert_eq!(result.merged.value(0, "note"), &CellValue::from("ok"));
    assert!(result.unmatched_a.is_empty());
    assert!(result.unmatched_b.is_empty());
}

#[test]
fn distant_region_leaves_both_rows_unmatched() {
    let a = dataset_a();
    let b = dataset_b("Oromia");
    let result = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &canonical_mapping(),
        &MatchOptions::default(),
    )
    .expect("match");

    assert!(result.merged.is_empty());
    assert_eq!(result.unmatched_a.rows, a.rows);
    assert_eq!(result.unmatched_b.rows, b.rows);
    assert_eq!(result.unmatched_b.columns, b.columns);
}

#[test]
fn renamed_only_compares_canonical_columns_as_written() {
    let a = dataset_a();
    let b = dataset_b("addis ababa");
    let options = MatchOptions::default().with_normalization(KeyNormalization::RenamedOnly);
    let result = match_and_merge(&a, &b, &canonical_mapping(), &canonical_mapping(), &options)
        .expect("match");

    // "Zone1" vs "zone 1" scores about 73 without lower-casing.
    assert!(result.merged.is_empty());
    assert_eq!(result.unmatched_a.len(), 1);
}

#[test]
fn b_key_columns_never_reach_merged_output() {
    let a = Table::from_records(
        ["Region", "Zone", "Woreda", "lat"],
        vec![vec![
            CellValue::from("Tigray"),
            CellValue::from("Central"),
            CellValue::from("Kola Tembien"),
            CellValue::Float(13.6),
        ]],
    )
    .expect("table a");
    let b = Table::from_records(
        ["REGION_NAME", "zone ", "Woreda", "penta1"],
        vec![vec![
            CellValue::from("tigray"),
            CellValue::from("central"),
            CellValue::from("tembien kola"),
            CellValue::Integer(412),
        ]],
    )
    .expect("table b");
    let mapping_a = resolve_columns(&a, &KeyField::ALL)
        .into_mapping("Dataset 1")
        .expect("resolve a");
    let mapping_b = resolve_columns(&b, &KeyField::ALL)
        .with_override(&b.columns, KeyField::Region, "REGION_NAME")
        .expect("override")
        .into_mapping("Dataset 2")
        .expect("resolve b");

    let result =
        match_and_merge(&a, &b, &mapping_a, &mapping_b, &MatchOptions::default()).expect("match");

    assert_eq!(
        result.merged.columns,
        vec!["Region", "Zone", "Woreda", "lat", "penta1"]
    );
    let row = &result.merged.rows[0];
    assert!(row.get("REGION_NAME").is_none());
    assert!(row.get("zone ").is_none());
    assert_eq!(row.get("Woreda"), Some(&CellValue::from("Kola Tembien")));
    assert_eq!(row.get("penta1"), Some(&CellValue::Integer(412)));
}

#[test]
fn merged_rows_follow_a_order() {
    let a = Table::from_records(
        ["region", "zone", "woreda", "id"],
        vec![
            with_id(&["afar", "z1", "w1"], 1),
            with_id(&["amhara", "z2", "w2"], 2),
            with_id(&["sidama", "z3", "w3"], 3),
        ],
    )
    .expect("table a");
    let b = Table::from_records(
        ["region", "zone", "woreda", "extra"],
        vec![
            text_row(&["sidama", "z3", "w3", "c"]),
            text_row(&["afar", "z1", "w1", "a"]),
        ],
    )
    .expect("table b");

    let result = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &canonical_mapping(),
        &MatchOptions::default(),
    )
    .expect("match");

    let ids: Vec<&CellValue> = result.merged.rows.iter().map(|r| &r.cells["id"]).collect();
    assert_eq!(ids, vec![&CellValue::Integer(1), &CellValue::Integer(3)]);
    assert_eq!(result.unmatched_a.value(0, "id"), &CellValue::Integer(2));
    assert!(result.unmatched_b.is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let a = dataset_a();
    let b = dataset_b("addis abeba");
    let options = MatchOptions::new(KeyThresholds::new(70, 70, 70).expect("thresholds"));
    let first = match_and_merge(&a, &b, &canonical_mapping(), &canonical_mapping(), &options)
        .expect("first");
    let second = match_and_merge(&a, &b, &canonical_mapping(), &canonical_mapping(), &options)
        .expect("second");
    assert_eq!(first, second);
}

#[test]
fn incomplete_mapping_is_rejected_before_matching() {
    let a = dataset_a();
    let b = dataset_b("addis ababa");
    let partial = ColumnMapping::new().with(KeyField::Region, "region");
    let err = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &partial,
        &MatchOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MapError::IncompleteMapping {
            keys: vec![KeyField::Zone, KeyField::Woreda]
        }
    );
}

#[test]
fn unresolved_columns_are_reported_per_dataset() {
    let b = Table::from_records(["Region", "Zone Name", "District"], Vec::new()).expect("table");
    let err = resolve_columns(&b, &KeyField::ALL)
        .into_mapping("Dataset 2")
        .unwrap_err();
    assert_eq!(
        err,
        MapError::UnresolvableColumns {
            dataset: "Dataset 2".to_string(),
            keys: vec![KeyField::Zone, KeyField::Woreda]
        }
    );
}

#[test]
fn rows_missing_the_same_keys_still_match() {
    let missing_woreda = vec![
        CellValue::from("Afar"),
        CellValue::from("Zone 1"),
        CellValue::Missing,
    ];
    let missing_upper = vec![
        CellValue::Missing,
        CellValue::Missing,
        CellValue::from("Dubti"),
    ];
    let a = Table::from_records(
        ["region", "zone", "woreda"],
        vec![missing_woreda.clone(), missing_upper.clone()],
    )
    .expect("table a");
    let b = Table::from_records(
        ["region", "zone", "woreda"],
        vec![missing_upper, missing_woreda],
    )
    .expect("table b");

    let result = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &canonical_mapping(),
        &MatchOptions::default(),
    )
    .expect("match");

    let pairs: Vec<(usize, usize)> = result
        .outcome
        .pairs
        .iter()
        .map(|pair| (pair.a_index, pair.b_index))
        .collect();
    assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    assert_eq!(result.merged.value(0, "woreda"), &CellValue::Missing);
    assert!(result.unmatched_a.is_empty());
    assert!(result.unmatched_b.is_empty());
}

#[test]
fn missing_key_does_not_match_present_value() {
    let a = Table::from_records(
        ["region", "zone", "woreda"],
        vec![text_row(&["Afar", "Zone 1", "Dubti"])],
    )
    .expect("table a");
    let b = Table::from_records(
        ["region", "zone", "woreda"],
        vec![vec![
            CellValue::from("Afar"),
            CellValue::from("Zone 1"),
            CellValue::Missing,
        ]],
    )
    .expect("table b");

    let result = match_and_merge(
        &a,
        &b,
        &canonical_mapping(),
        &canonical_mapping(),
        &MatchOptions::default(),
    )
    .expect("match");
    assert!(result.merged.is_empty());
}
