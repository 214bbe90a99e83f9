#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{ModelError, Result};

static MISSING: CellValue = CellValue::Missing;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Renders the cell the way it is compared and exported.
    ///
    /// Integral floats drop their fractional part and `Missing` is empty.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => format_float(*value),
            Self::Missing => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table, rejecting blank or repeated column names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if column.trim().is_empty() {
                return Err(ModelError::BlankColumn);
            }
            if !seen.insert(column.as_str()) {
                return Err(ModelError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a table from positional records, one value per column.
    pub fn from_records<C, R>(columns: C, records: R) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<CellValue>>,
    {
        let mut table = Self::new(columns.into_iter().map(Into::into).collect())?;
        for values in records {
            table.push_values(values)?;
        }
        Ok(table)
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn push_values(&mut self, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        let cells = self.columns.iter().cloned().zip(values).collect();
        self.rows.push(Row { cells });
        Ok(())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `row`/`column`; absent cells read as [`CellValue::Missing`].
    pub fn value(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&MISSING)
    }
}
