//! Normalized comparison view over a table's key columns.
//!
//! The view holds only the three key strings per row, already converted to
//! text and normalized. The source table is left untouched so results can
//! be assembled from original values.

use geomerge_model::{ColumnMapping, KeyField, KeyNormalization, Table};

use crate::error::MapError;

/// Stands in for a missing key cell so that two missing values compare equal
/// under every scorer.
pub const MISSING_KEY_TEXT: &str = "nan";

/// Key strings of one row, indexed by [`KeyField`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues([String; 3]);

impl KeyValues {
    pub fn new(
        region: impl Into<String>,
        zone: impl Into<String>,
        woreda: impl Into<String>,
    ) -> Self {
        Self([region.into(), zone.into(), woreda.into()])
    }

    pub fn get(&self, key: KeyField) -> &str {
        &self.0[slot(key)]
    }
}

fn slot(key: KeyField) -> usize {
    match key {
        KeyField::Region => 0,
        KeyField::Zone => 1,
        KeyField::Woreda => 2,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedView {
    rows: Vec<KeyValues>,
}

impl NormalizedView {
    /// Builds the view of `table` through `mapping`.
    ///
    /// Fails if the mapping does not cover every key or names a column the
    /// table does not have.
    pub fn build(
        table: &Table,
        mapping: &ColumnMapping,
        normalization: KeyNormalization,
    ) -> Result<Self, MapError> {
        check_mapping(table, mapping)?;

        let mut sources: Vec<(&str, bool)> = Vec::with_capacity(KeyField::ALL.len());
        for key in KeyField::ALL {
            let column = mapping
                .get(key)
                .ok_or_else(|| MapError::IncompleteMapping { keys: vec![key] })?;
            let normalize = match normalization {
                KeyNormalization::Always => true,
                KeyNormalization::RenamedOnly => column != key.as_str(),
            };
            sources.push((column, normalize));
        }

        let rows = (0..table.len())
            .map(|row| {
                let mut values: [String; 3] = Default::default();
                for (value, (column, normalize)) in values.iter_mut().zip(&sources) {
                    let cell = table.value(row, column);
                    let text = if cell.is_missing() {
                        MISSING_KEY_TEXT.to_string()
                    } else {
                        cell.to_text()
                    };
                    *value = if *normalize {
                        normalize_key_text(&text)
                    } else {
                        text
                    };
                }
                KeyValues(values)
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<KeyValues>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&KeyValues> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[KeyValues] {
        &self.rows
    }
}

/// Trims and lower-cases a key value.
pub fn normalize_key_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn check_mapping(table: &Table, mapping: &ColumnMapping) -> Result<(), MapError> {
    let missing = mapping.missing_keys();
    if !missing.is_empty() {
        return Err(MapError::IncompleteMapping { keys: missing });
    }
    if let Some((key, column)) = mapping.absent_columns(table).into_iter().next() {
        return Err(MapError::MissingMappedColumn { key, column });
    }
    Ok(())
}
