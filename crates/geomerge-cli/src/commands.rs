use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geomerge_model::{KeyField, MatchOptions};
use tracing::{debug, info_span};

use geomerge_cli::pipeline::{DatasetSummary, MatchReport, MatchRequest, load, resolve, run_match};

use crate::cli::{ColumnOverride, ColumnsArgs, MatchArgs};

pub fn run_match_command(args: &MatchArgs) -> Result<MatchReport> {
    let span = info_span!("match", output_dir = %args.output_dir.display());
    let _guard = span.enter();
    let options = build_options(args)?;
    debug!(?options, "match options");
    let request = MatchRequest {
        dataset_a: args.dataset_a.clone(),
        dataset_b: args.dataset_b.clone(),
        output_dir: args.output_dir.clone(),
        options,
        overrides_a: overrides(&args.map_a),
        overrides_b: overrides(&args.map_b),
        max_rows: args.max_rows,
        dry_run: args.dry_run,
    };
    run_match(&request)
}

pub fn run_columns(args: &ColumnsArgs) -> Result<Vec<DatasetSummary>> {
    let mut summaries = Vec::with_capacity(args.datasets.len());
    for (idx, path) in args.datasets.iter().enumerate() {
        let label = format!("Dataset {}", idx + 1);
        let table = load(&label, path)?;
        summaries.push(resolve(&label, path, &table, &[])?);
    }
    Ok(summaries)
}

/// Options from `--config` (or defaults), then individual flags on top.
fn build_options(args: &MatchArgs) -> Result<MatchOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => MatchOptions::default(),
    };
    for (key, value) in [
        (KeyField::Region, args.region_threshold),
        (KeyField::Zone, args.zone_threshold),
        (KeyField::Woreda, args.woreda_threshold),
    ] {
        if let Some(value) = value {
            options.thresholds.set(key, value);
        }
    }
    if let Some(strategy) = args.strategy {
        options.strategy = strategy.into();
    }
    if let Some(normalization) = args.normalization {
        options.normalization = normalization.into();
    }
    options
        .thresholds
        .validate()
        .context("invalid thresholds")?;
    Ok(options)
}

fn load_options(path: &Path) -> Result<MatchOptions> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn overrides(values: &[ColumnOverride]) -> Vec<(KeyField, String)> {
    values
        .iter()
        .map(|value| (value.key, value.column.clone()))
        .collect()
}
