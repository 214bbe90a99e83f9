//! Canonical key fields and per-table column mappings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::table::Table;

/// One level of the region → zone → woreda hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KeyField {
    Region,
    Zone,
    /// Sub-district level.
    Woreda,
}

impl KeyField {
    /// All canonical keys in hierarchy order.
    pub const ALL: [KeyField; 3] = [KeyField::Region, KeyField::Zone, KeyField::Woreda];

    /// The canonical (lower-case) column name for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Zone => "zone",
            Self::Woreda => "woreda",
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "zone" => Ok(Self::Zone),
            "woreda" => Ok(Self::Woreda),
            _ => Err(ModelError::UnknownKeyField(s.to_string())),
        }
    }
}

/// Canonical key → actual column name for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<KeyField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `key` to `column`, replacing any earlier mapping for the key.
    pub fn insert(&mut self, key: KeyField, column: impl Into<String>) -> Option<String> {
        self.columns.insert(key, column.into())
    }

    #[must_use]
    pub fn with(mut self, key: KeyField, column: impl Into<String>) -> Self {
        self.insert(key, column);
        self
    }

    pub fn get(&self, key: KeyField) -> Option<&str> {
        self.columns.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyField, &str)> {
        self.columns.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when every canonical key has a column.
    pub fn is_complete(&self) -> bool {
        KeyField::ALL.iter().all(|k| self.columns.contains_key(k))
    }

    pub fn missing_keys(&self) -> Vec<KeyField> {
        KeyField::ALL
            .into_iter()
            .filter(|k| !self.columns.contains_key(k))
            .collect()
    }

    /// True if `column` is mapped to any key.
    pub fn maps_column(&self, column: &str) -> bool {
        self.columns.values().any(|c| c == column)
    }

    /// Mapped keys whose column does not exist in `table`.
    pub fn absent_columns(&self, table: &Table) -> Vec<(KeyField, String)> {
        self.columns
            .iter()
            .filter(|(_, column)| !table.has_column(column))
            .map(|(key, column)| (*key, column.clone()))
            .collect()
    }
}
