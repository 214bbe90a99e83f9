//! Locating the key columns of a table by fuzzy column-name comparison.

use std::collections::BTreeMap;

use geomerge_model::{ColumnMapping, KeyField, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MapError;
use crate::similarity::ratio;

/// Minimum name score for a column to be accepted as a key column.
///
/// Fixed and separate from the row thresholds: it decides which column holds
/// a key, not whether two values agree.
pub const COLUMN_MATCH_MIN_SCORE: f64 = 85.0;

/// Best-scoring column for one key, accepted or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCandidate {
    /// Column name as it appears in the table.
    pub column: String,
    pub score: f64,
    /// Chosen explicitly instead of by score.
    pub overridden: bool,
}

impl ColumnCandidate {
    pub fn is_accepted(&self) -> bool {
        self.overridden || self.score >= COLUMN_MATCH_MIN_SCORE
    }
}

/// Outcome of resolving the key columns of one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnResolution {
    pub mapping: ColumnMapping,
    /// Keys without an accepted column, in request order.
    pub missing: Vec<KeyField>,
    /// Best candidate per key, including rejected ones.
    pub best: BTreeMap<KeyField, ColumnCandidate>,
}

impl ColumnResolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Pins `key` to `column`, regardless of its name score.
    pub fn with_override(
        mut self,
        columns: &[String],
        key: KeyField,
        column: &str,
    ) -> Result<Self, MapError> {
        if !columns.iter().any(|c| c == column) {
            return Err(MapError::UnknownOverrideColumn {
                key,
                column: column.to_string(),
            });
        }
        let score = ratio(key.as_str(), &normalize_column_name(column));
        self.mapping.insert(key, column);
        self.missing.retain(|k| *k != key);
        self.best.insert(
            key,
            ColumnCandidate {
                column: column.to_string(),
                score,
                overridden: true,
            },
        );
        Ok(self)
    }

    /// The complete mapping, or the keys that could not be resolved for `dataset`.
    pub fn into_mapping(self, dataset: &str) -> Result<ColumnMapping, MapError> {
        if self.missing.is_empty() {
            Ok(self.mapping)
        } else {
            Err(MapError::UnresolvableColumns {
                dataset: dataset.to_string(),
                keys: self.missing,
            })
        }
    }
}

/// Resolves `required` keys against the columns of `table`.
pub fn resolve_columns(table: &Table, required: &[KeyField]) -> ColumnResolution {
    resolve_column_names(&table.columns, required)
}

/// Resolves `required` keys against a list of column names.
///
/// Names are compared trimmed and lower-cased. For each key the highest
/// scoring column wins, with ties going to the earliest column. A key whose
/// best column scores below [`COLUMN_MATCH_MIN_SCORE`] is reported missing.
pub fn resolve_column_names(columns: &[String], required: &[KeyField]) -> ColumnResolution {
    let normalized: Vec<String> = columns.iter().map(|c| normalize_column_name(c)).collect();
    let mut resolution = ColumnResolution::default();

    for &key in required {
        let Some(candidate) = best_candidate(key, columns, &normalized) else {
            warn!(key = %key, "no columns to resolve against");
            resolution.missing.push(key);
            continue;
        };
        if candidate.is_accepted() {
            debug!(
                key = %key,
                column = %candidate.column,
                score = candidate.score,
                "resolved key column"
            );
            resolution.mapping.insert(key, candidate.column.clone());
        } else {
            warn!(
                key = %key,
                best_column = %candidate.column,
                score = candidate.score,
                "best column is below the name score floor"
            );
            resolution.missing.push(key);
        }
        resolution.best.insert(key, candidate);
    }

    resolution
}

fn best_candidate(
    key: KeyField,
    columns: &[String],
    normalized: &[String],
) -> Option<ColumnCandidate> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, name) in normalized.iter().enumerate() {
        let score = ratio(key.as_str(), name);
        // Strictly greater: the first column keeps a tied score.
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, score)| ColumnCandidate {
        column: columns[idx].clone(),
        score,
        overridden: false,
    })
}

fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
