//! Data model for reconciling administrative hierarchy datasets.
//!
//! A [`Table`] is an ordered set of named columns and rows of [`CellValue`]s.
//! Every table is expected to expose one column per [`KeyField`]; which
//! column that is gets recorded in a [`ColumnMapping`].

pub mod error;
pub mod keys;
pub mod options;
pub mod table;

pub use error::{ModelError, Result};
pub use keys::{ColumnMapping, KeyField};
pub use options::{KeyNormalization, KeyThresholds, MatchOptions, MatchStrategy};
pub use table::{CellValue, Row, Table};
