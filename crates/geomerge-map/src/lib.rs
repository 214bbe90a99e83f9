//! Fuzzy reconciliation of two administrative hierarchy datasets.
//!
//! The crate has two independent policies:
//!
//! - [`resolver`] finds which column of a table holds each canonical key,
//!   comparing column names against a fixed score floor.
//! - [`match_and_merge`] pairs rows of two tables whose region, zone and
//!   woreda values all reach caller-supplied thresholds, then assembles the
//!   merged and leftover tables.
//!
//! # Example
//!
//! ```ignore
//! use geomerge_map::{match_and_merge, resolve_columns};
//! use geomerge_model::{KeyField, MatchOptions};
//!
//! let mapping_a = resolve_columns(&table_a, &KeyField::ALL).into_mapping("Dataset 1")?;
//! let mapping_b = resolve_columns(&table_b, &KeyField::ALL).into_mapping("Dataset 2")?;
//! let options = MatchOptions::default();
//! let result = match_and_merge(&table_a, &table_b, &mapping_a, &mapping_b, &options)?;
//! ```

pub mod error;
pub mod matcher;
pub mod merge;
pub mod resolver;
pub mod similarity;
pub mod view;

use geomerge_model::{ColumnMapping, MatchOptions, Table};
use tracing::{debug, info, info_span};

pub use error::MapError;
pub use matcher::{KeyScores, MatchOutcome, MatchedPair, match_rows};
pub use merge::{MergeResult, assemble};
pub use resolver::{
    COLUMN_MATCH_MIN_SCORE, ColumnCandidate, ColumnResolution, resolve_column_names,
    resolve_columns,
};
pub use similarity::{ratio, token_set_ratio};
pub use view::{KeyValues, MISSING_KEY_TEXT, NormalizedView, normalize_key_text};

/// Matches rows of `table_a` against `table_b` and builds the result tables.
///
/// Both mappings must cover every canonical key with a column that exists in
/// their table; this is checked before any matching work.
pub fn match_and_merge(
    table_a: &Table,
    table_b: &Table,
    mapping_a: &ColumnMapping,
    mapping_b: &ColumnMapping,
    options: &MatchOptions,
) -> Result<MergeResult, MapError> {
    let span = info_span!(
        "match_and_merge",
        rows_a = table_a.len(),
        rows_b = table_b.len(),
        strategy = ?options.strategy
    );
    let _guard = span.enter();

    options.thresholds.validate()?;
    let view_a = NormalizedView::build(table_a, mapping_a, options.normalization)?;
    let view_b = NormalizedView::build(table_b, mapping_b, options.normalization)?;
    debug!(
        region = options.thresholds.region,
        zone = options.thresholds.zone,
        woreda = options.thresholds.woreda,
        "built normalized views"
    );

    let outcome = match_rows(&view_a, &view_b, options);
    info!(
        matched = outcome.matched_count(),
        unmatched_a = outcome.unmatched_a.len(),
        unmatched_b = outcome.unmatched_b.len(),
        "matching complete"
    );

    Ok(assemble(table_a, table_b, mapping_b, outcome))
}
