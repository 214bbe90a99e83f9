//! Recognized input formats.

use std::path::Path;

use crate::error::{IngestError, Result};

/// File layouts the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    /// Excel workbook; the first worksheet is read.
    Xlsx,
}

impl TableFormat {
    /// Picks the format from the file extension (case-insensitive).
    ///
    /// `.csv` and `.txt` read as comma separated, `.tsv` and `.tab` as tab
    /// separated, `.xlsx` and `.xls` as workbooks. Anything else is rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xls" => Ok(Self::Xlsx),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Field separator, or `None` for workbooks.
    pub fn delimiter(self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::Xlsx => None,
        }
    }

    pub fn is_workbook(self) -> bool {
        self.delimiter().is_none()
    }
}
