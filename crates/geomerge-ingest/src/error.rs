//! Error types for dataset loading.

use std::path::PathBuf;

use geomerge_model::ModelError;
use thiserror::Error;

/// Errors raised while loading a dataset file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, limit is {max_size}")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Format Errors ===
    /// Extension is not a supported tabular format.
    #[error("unsupported file format '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Byte order mark of an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// The CSV reader rejected the file.
    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The spreadsheet reader rejected the file.
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Workbook without any worksheet.
    #[error("workbook has no worksheet: {path}")]
    NoWorksheet { path: PathBuf },

    /// File has no header row.
    #[error("file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// A header cell is blank.
    #[error("column {index} has an empty name in {path}")]
    EmptyColumnName { path: PathBuf, index: usize },

    /// The same header appears twice.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { path: PathBuf, column: String },

    /// A data row has more fields than the header.
    #[error("line {line} of {path} has {actual} fields, header has {expected}")]
    RowWidth {
        path: PathBuf,
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, IngestError>;
