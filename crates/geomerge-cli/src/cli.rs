//! CLI argument definitions for the dataset matcher.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use geomerge_model::{KeyField, KeyNormalization, MatchStrategy};

#[derive(Parser)]
#[command(
    name = "geomerge",
    version,
    about = "Match and merge two region/zone/woreda datasets",
    long_about = "Match rows of two administrative datasets by fuzzy comparison of\n\
                  their region, zone and woreda columns.\n\n\
                  Writes merged_data.csv, unmatched_dataset1.csv and unmatched_dataset2.csv."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (place names) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match two datasets and write the merged and unmatched tables.
    Match(MatchArgs),

    /// Show which columns would be used as region, zone and woreda.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// First dataset (CSV, TSV or TXT).
    #[arg(value_name = "DATASET_1")]
    pub dataset_a: PathBuf,

    /// Second dataset (CSV, TSV or TXT).
    #[arg(value_name = "DATASET_2")]
    pub dataset_b: PathBuf,

    /// Output directory for result files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// JSON file with match options; flags below take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum region similarity (0-100).
    #[arg(
        long = "region-threshold",
        value_name = "SCORE",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub region_threshold: Option<u8>,

    /// Minimum zone similarity (0-100).
    #[arg(
        long = "zone-threshold",
        value_name = "SCORE",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub zone_threshold: Option<u8>,

    /// Minimum woreda similarity (0-100).
    #[arg(
        long = "woreda-threshold",
        value_name = "SCORE",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub woreda_threshold: Option<u8>,

    /// How a row picks among several qualifying partners.
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Which key columns are lower-cased and trimmed before comparison.
    #[arg(long = "normalization", value_enum)]
    pub normalization: Option<NormalizationArg>,

    /// Pin a key column of dataset 1, e.g. `--map-a region=Region Name`.
    #[arg(
        long = "map-a",
        value_name = "KEY=COLUMN",
        value_parser = parse_override
    )]
    pub map_a: Vec<ColumnOverride>,

    /// Pin a key column of dataset 2.
    #[arg(
        long = "map-b",
        value_name = "KEY=COLUMN",
        value_parser = parse_override
    )]
    pub map_b: Vec<ColumnOverride>,

    /// Refuse to match tables with more rows than this.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Match and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Datasets to inspect.
    #[arg(value_name = "DATASET", required = true)]
    pub datasets: Vec<PathBuf>,
}

/// A `KEY=COLUMN` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOverride {
    pub key: KeyField,
    pub column: String,
}

fn parse_override(raw: &str) -> Result<ColumnOverride, String> {
    let (key, column) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=COLUMN, got `{raw}`"))?;
    let key: KeyField = key.parse().map_err(|error| format!("{error}"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name for `{key}`"));
    }
    Ok(ColumnOverride {
        key,
        column: column.to_string(),
    })
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    FirstFit,
    BestFit,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::FirstFit => MatchStrategy::FirstFit,
            StrategyArg::BestFit => MatchStrategy::BestFit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NormalizationArg {
    Always,
    RenamedOnly,
}

impl From<NormalizationArg> for KeyNormalization {
    fn from(value: NormalizationArg) -> Self {
        match value {
            NormalizationArg::Always => KeyNormalization::Always,
            NormalizationArg::RenamedOnly => KeyNormalization::RenamedOnly,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_column_override() {
        let parsed = parse_override("Region=REGION NAME ").unwrap();
        assert_eq!(parsed.key, KeyField::Region);
        assert_eq!(parsed.column, "REGION NAME");
    }

    #[test]
    fn rejects_malformed_override() {
        assert!(parse_override("region").is_err());
        assert!(parse_override("kebele=x").is_err());
        assert!(parse_override("zone=").is_err());
    }

    #[test]
    fn thresholds_are_range_checked() {
        let result = Cli::try_parse_from([
            "geomerge",
            "match",
            "a.csv",
            "b.csv",
            "--zone-threshold",
            "101",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn match_defaults() {
        let cli = Cli::try_parse_from(["geomerge", "match", "a.csv", "b.csv"]).unwrap();
        let Command::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(args.output_dir, PathBuf::from("output"));
        assert!(args.region_threshold.is_none());
        assert!(!args.dry_run);
        assert!(args.map_a.is_empty());
    }
}
