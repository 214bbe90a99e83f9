use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("column name must not be blank")]
    BlankColumn,
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{key} threshold {value} is outside 0..=100")]
    InvalidThreshold { key: &'static str, value: u8 },
    #[error("unknown key field: {0}")]
    UnknownKeyField(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
