//! Error types for column resolution and matching.

use geomerge_model::{KeyField, ModelError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// No column scored high enough for one or more canonical keys.
    #[error("{dataset}: no column confidently matches {}", join_keys(.keys))]
    UnresolvableColumns {
        dataset: String,
        keys: Vec<KeyField>,
    },

    #[error("column mapping is missing {}", join_keys(.keys))]
    IncompleteMapping { keys: Vec<KeyField> },

    #[error("{key} is mapped to '{column}', which is not a column of the table")]
    MissingMappedColumn { key: KeyField, column: String },

    #[error("override for {key} names unknown column '{column}'")]
    UnknownOverrideColumn { key: KeyField, column: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn join_keys(keys: &[KeyField]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_unresolved_keys() {
        let err = MapError::UnresolvableColumns {
            dataset: "Dataset 2".to_string(),
            keys: vec![KeyField::Zone, KeyField::Woreda],
        };
        assert_eq!(
            err.to_string(),
            "Dataset 2: no column confidently matches zone, woreda"
        );
    }
}
