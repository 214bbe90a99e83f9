use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geomerge_map::MergeResult;
use geomerge_model::Table;
use serde::Serialize;
use tracing::info;

pub const MERGED_FILE_NAME: &str = "merged_data.csv";
pub const UNMATCHED_A_FILE_NAME: &str = "unmatched_dataset1.csv";
pub const UNMATCHED_B_FILE_NAME: &str = "unmatched_dataset2.csv";

/// Files written by [`write_match_outputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub merged: PathBuf,
    pub unmatched_a: PathBuf,
    pub unmatched_b: PathBuf,
}

/// Writes `table` as CSV: a header row, then one line per row in table order.
pub fn write_table_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer
        .write_record(&table.columns)
        .context("write header")?;
    for idx in 0..table.len() {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| table.value(idx, column).to_text())
            .collect();
        csv_writer
            .write_record(&record)
            .with_context(|| format!("write row {idx}"))?;
    }
    csv_writer.flush().context("flush csv")?;
    Ok(())
}

pub fn table_to_csv(table: &Table) -> Result<String> {
    let mut buffer = Vec::new();
    write_table_csv(table, &mut buffer)?;
    String::from_utf8(buffer).context("csv output is not utf-8")
}

pub fn write_table_csv_file(table: &Table, path: &Path) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_table_csv(table, file).with_context(|| format!("write {}", path.display()))
}

/// Writes the merged and both unmatched tables into `dir`, creating it if needed.
///
/// Empty tables are still written, header only.
pub fn write_match_outputs(result: &MergeResult, dir: &Path) -> Result<OutputPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let paths = OutputPaths {
        merged: dir.join(MERGED_FILE_NAME),
        unmatched_a: dir.join(UNMATCHED_A_FILE_NAME),
        unmatched_b: dir.join(UNMATCHED_B_FILE_NAME),
    };
    write_table_csv_file(&result.merged, &paths.merged)?;
    write_table_csv_file(&result.unmatched_a, &paths.unmatched_a)?;
    write_table_csv_file(&result.unmatched_b, &paths.unmatched_b)?;
    info!(
        dir = %dir.display(),
        merged = result.merged.len(),
        unmatched_a = result.unmatched_a.len(),
        unmatched_b = result.unmatched_b.len(),
        "wrote match outputs"
    );
    Ok(paths)
}
