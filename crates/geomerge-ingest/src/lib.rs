//! Dataset loading for geomerge.
//!
//! Reads comma or tab separated files and Excel workbooks into
//! [`geomerge_model::Table`]s.
//! Failures are reported as [`IngestError`] and surfaced to the caller as is.

mod error;
mod format;
mod reader;

pub use error::{IngestError, Result};
pub use format::TableFormat;
pub use reader::{
    MAX_FILE_SIZE, ReadOptions, check_file_size, parse_table, read_table,
    read_table_with_options, validate_encoding,
};
