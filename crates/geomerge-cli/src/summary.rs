use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use geomerge_cli::pipeline::{DatasetSummary, MatchReport};
use geomerge_map::COLUMN_MATCH_MIN_SCORE;
use geomerge_model::KeyField;

pub fn print_match_report(report: &MatchReport) {
    print_resolution(&[&report.dataset_a, &report.dataset_b]);
    if !report.is_resolved() {
        for (label, keys) in report.unresolved() {
            let names: Vec<&str> = keys.iter().map(|key| key.as_str()).collect();
            eprintln!(
                "error: {label}: could not find column(s) for {}",
                names.join(", ")
            );
        }
        return;
    }
    let Some(result) = &report.result else {
        return;
    };
    let thresholds = report.options.thresholds;
    println!(
        "Thresholds: region {} / zone {} / woreda {}",
        thresholds.region, thresholds.zone, thresholds.woreda
    );

    let mut table = Table::new();
    table.set_header(vec![header_cell("Result"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Matched"),
        count_cell(result.merged.len(), Color::Green),
    ]);
    table.add_row(vec![
        Cell::new(format!("Unmatched in {}", report.dataset_a.label)),
        count_cell(result.unmatched_a.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(format!("Unmatched in {}", report.dataset_b.label)),
        count_cell(result.unmatched_b.len(), Color::Yellow),
    ]);
    println!("{table}");

    match &report.outputs {
        Some(paths) => {
            println!("Merged: {}", paths.merged.display());
            println!("Unmatched 1: {}", paths.unmatched_a.display());
            println!("Unmatched 2: {}", paths.unmatched_b.display());
        }
        None => println!("Dry run: no files written"),
    }
}

pub fn print_resolution(summaries: &[&DatasetSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("Key"),
        header_cell("Column"),
        header_cell("Score"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in summaries {
        for (idx, key) in KeyField::ALL.iter().enumerate() {
            let (dataset, rows) = if idx == 0 {
                (
                    Cell::new(&summary.label).add_attribute(Attribute::Bold),
                    Cell::new(summary.rows),
                )
            } else {
                (dim_cell(""), dim_cell(""))
            };
            table.add_row(vec![
                dataset,
                rows,
                Cell::new(key.as_str()),
                column_cell(summary, *key),
                score_cell(summary, *key),
            ]);
        }
    }
    println!("{table}");
}

fn column_cell(summary: &DatasetSummary, key: KeyField) -> Cell {
    match summary.resolution.best.get(&key) {
        Some(candidate) if candidate.is_accepted() => {
            let label = if candidate.overridden {
                format!("{} (override)", candidate.column)
            } else {
                candidate.column.clone()
            };
            Cell::new(label).fg(Color::Green)
        }
        Some(candidate) => Cell::new(format!("not found (best: {})", candidate.column))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => Cell::new("not found")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn score_cell(summary: &DatasetSummary, key: KeyField) -> Cell {
    match summary.resolution.best.get(&key) {
        Some(candidate) if candidate.score >= COLUMN_MATCH_MIN_SCORE => {
            Cell::new(format!("{:.1}", candidate.score))
        }
        Some(candidate) => Cell::new(format!("{:.1}", candidate.score)).fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
