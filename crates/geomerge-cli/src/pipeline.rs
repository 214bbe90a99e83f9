//! Load, resolve, match and export stages shared by the CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use geomerge_ingest::read_table;
use geomerge_map::{ColumnResolution, MergeResult, match_and_merge, resolve_columns};
use geomerge_model::{ColumnMapping, KeyField, MatchOptions, Table};
use geomerge_output::{OutputPaths, write_match_outputs};
use tracing::{debug, info, info_span, warn};

use crate::logging::redact_value;

/// Display labels of the two inputs, used in messages and reports.
pub const DATASET_A_LABEL: &str = "Dataset 1";
pub const DATASET_B_LABEL: &str = "Dataset 2";

/// One loaded input and how its key columns were resolved.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub label: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub resolution: ColumnResolution,
}

/// Everything `run_match` needs.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub dataset_a: PathBuf,
    pub dataset_b: PathBuf,
    pub output_dir: PathBuf,
    pub options: MatchOptions,
    pub overrides_a: Vec<(KeyField, String)>,
    pub overrides_b: Vec<(KeyField, String)>,
    pub max_rows: Option<usize>,
    pub dry_run: bool,
}

impl MatchRequest {
    pub fn new(dataset_a: impl Into<PathBuf>, dataset_b: impl Into<PathBuf>) -> Self {
        Self {
            dataset_a: dataset_a.into(),
            dataset_b: dataset_b.into(),
            output_dir: PathBuf::from("output"),
            options: MatchOptions::default(),
            overrides_a: Vec::new(),
            overrides_b: Vec::new(),
            max_rows: None,
            dry_run: false,
        }
    }
}

/// Result of one `match` run.
///
/// `result` is `None` when a key column could not be resolved in either
/// dataset; the resolutions then say which.
#[derive(Debug)]
pub struct MatchReport {
    pub dataset_a: DatasetSummary,
    pub dataset_b: DatasetSummary,
    pub options: MatchOptions,
    pub result: Option<MergeResult>,
    pub outputs: Option<OutputPaths>,
}

impl MatchReport {
    /// `(dataset label, missing keys)` for every dataset with unresolved keys.
    pub fn unresolved(&self) -> Vec<(&str, &[KeyField])> {
        [&self.dataset_a, &self.dataset_b]
            .into_iter()
            .filter(|summary| !summary.resolution.is_complete())
            .map(|summary| (summary.label.as_str(), &summary.resolution.missing[..]))
            .collect()
    }

    pub fn is_resolved(&self) -> bool {
        self.dataset_a.resolution.is_complete() && self.dataset_b.resolution.is_complete()
    }
}

/// Loads a dataset file.
pub fn load(label: &str, path: &Path) -> Result<Table> {
    let span = info_span!("load", dataset = label, path = %path.display());
    let _guard = span.enter();
    let table =
        read_table(path).with_context(|| format!("load {label} from {}", path.display()))?;
    info!(
        rows = table.len(),
        columns = table.width(),
        "loaded dataset"
    );
    Ok(table)
}

/// Resolves the key columns of `table`, then applies explicit overrides.
pub fn resolve(
    label: &str,
    path: &Path,
    table: &Table,
    overrides: &[(KeyField, String)],
) -> Result<DatasetSummary> {
    let mut resolution = resolve_columns(table, &KeyField::ALL);
    for (key, column) in overrides {
        resolution = resolution
            .with_override(&table.columns, *key, column)
            .with_context(|| format!("override for {label}"))?;
    }
    for key in &resolution.missing {
        warn!(dataset = label, key = %key, "key column not found");
    }
    Ok(DatasetSummary {
        label: label.to_string(),
        path: path.to_path_buf(),
        rows: table.len(),
        columns: table.width(),
        resolution,
    })
}

/// Runs the whole pipeline: load, resolve, match, write.
pub fn run_match(request: &MatchRequest) -> Result<MatchReport> {
    let table_a = load(DATASET_A_LABEL, &request.dataset_a)?;
    let table_b = load(DATASET_B_LABEL, &request.dataset_b)?;

    let summary_a = resolve(
        DATASET_A_LABEL,
        &request.dataset_a,
        &table_a,
        &request.overrides_a,
    )?;
    let summary_b = resolve(
        DATASET_B_LABEL,
        &request.dataset_b,
        &table_b,
        &request.overrides_b,
    )?;

    let mut report = MatchReport {
        dataset_a: summary_a,
        dataset_b: summary_b,
        options: request.options,
        result: None,
        outputs: None,
    };
    if !report.is_resolved() {
        return Ok(report);
    }

    if let Some(limit) = request.max_rows {
        for (label, rows) in [
            (DATASET_A_LABEL, table_a.len()),
            (DATASET_B_LABEL, table_b.len()),
        ] {
            if rows > limit {
                bail!("{label} has {rows} rows, more than --max-rows {limit}");
            }
        }
    }

    let mapping_a = report
        .dataset_a
        .resolution
        .clone()
        .into_mapping(DATASET_A_LABEL)?;
    let mapping_b = report
        .dataset_b
        .resolution
        .clone()
        .into_mapping(DATASET_B_LABEL)?;
    let result = match_and_merge(&table_a, &table_b, &mapping_a, &mapping_b, &request.options)
        .context("match datasets")?;
    log_unmatched(
        &table_a,
        &mapping_a,
        &result.outcome.unmatched_a,
        DATASET_A_LABEL,
    );
    log_unmatched(
        &table_b,
        &mapping_b,
        &result.outcome.unmatched_b,
        DATASET_B_LABEL,
    );

    if request.dry_run {
        info!("dry run, skipping output files");
    } else {
        let dir = &request.output_dir;
        let outputs = write_match_outputs(&result, dir)
            .with_context(|| format!("write outputs to {}", dir.display()))?;
        report.outputs = Some(outputs);
    }
    report.result = Some(result);
    Ok(report)
}

fn log_unmatched(table: &Table, mapping: &ColumnMapping, indices: &[usize], label: &str) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    for &row in indices {
        let keys: Vec<String> = mapping
            .iter()
            .map(|(_, column)| table.value(row, column).to_text())
            .map(|text| redact_value(&text).to_string())
            .collect();
        debug!(dataset = label, row, keys = %keys.join(" / "), "unmatched row");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let request = MatchRequest::new("a.csv", "b.csv");
        assert_eq!(request.output_dir, PathBuf::from("output"));
        assert_eq!(request.options, MatchOptions::default());
        assert!(!request.dry_run);
    }
}
