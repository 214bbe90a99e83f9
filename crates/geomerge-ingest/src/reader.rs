//! Reading delimited text and spreadsheet files into [`Table`]s.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use geomerge_model::{CellValue, Table};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::format::TableFormat;

/// Maximum file size for loading (500 MB default).
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Options for [`read_table_with_options`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Files larger than this are rejected before parsing.
    pub max_file_size: u64,
    /// Type columns whose values all parse as numbers as integer or float.
    /// When off every non-empty cell is text.
    pub infer_numbers: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            infer_numbers: true,
        }
    }
}

/// Reads a dataset file with default options.
pub fn read_table(path: &Path) -> Result<Table> {
    read_table_with_options(path, &ReadOptions::default())
}

/// Reads a dataset file, choosing the layout from its extension.
pub fn read_table_with_options(path: &Path, options: &ReadOptions) -> Result<Table> {
    let format = TableFormat::from_path(path)?;
    check_file_size(path, options.max_file_size)?;

    let table = if format.is_workbook() {
        read_workbook(path, options)?
    } else {
        validate_encoding(path)?;
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        parse_table(file, format, path, options)?
    };
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.width(),
        "loaded dataset"
    );
    Ok(table)
}

/// Parses delimited text from `reader`; `path` is only used in errors.
///
/// The first record is the header. Header names are trimmed and a UTF-8 BOM
/// is dropped; data cells keep their text as written. Records whose cells
/// are all blank are skipped, short records are padded with missing cells,
/// and long records are an error.
pub fn parse_table<R: Read>(
    reader: R,
    format: TableFormat,
    path: &Path,
    options: &ReadOptions,
) -> Result<Table> {
    let Some(delimiter) = format.delimiter() else {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: "workbook stream".to_string(),
        });
    };
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|source| parse_error(path, source))?,
        None => {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
    };
    let columns = read_header(header.iter(), path)?;
    let width = columns.len();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record.map_err(|source| parse_error(path, source))?;
        if record.iter().all(is_blank) {
            continue;
        }
        if record.len() > width {
            return Err(IngestError::RowWidth {
                path: path.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
                expected: width,
                actual: record.len(),
            });
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    build_table(columns, raw_rows, path, options)
}

/// Reads the first worksheet of a spreadsheet file.
///
/// The first row of the used range is the header. Cells are rendered as
/// text and then typed with the same column rules as delimited files.
fn read_workbook(path: &Path, options: &ReadOptions) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|source| workbook_error(path, source))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|source| workbook_error(path, source))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let header: Vec<String> = header.iter().map(sheet_cell_text).collect();
    let columns = read_header(header.iter().map(String::as_str), path)?;

    let raw_rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(sheet_cell_text).collect::<Vec<String>>())
        .filter(|row| !row.iter().all(|value| is_blank(value)))
        .collect();
    debug!(path = %path.display(), sheet_rows = raw_rows.len(), "read worksheet");

    build_table(columns, raw_rows, path, options)
}

fn sheet_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.clone(),
        other => other.to_string(),
    }
}

/// Types each column and builds the table; short rows are padded.
fn build_table(
    columns: Vec<String>,
    mut raw_rows: Vec<Vec<String>>,
    path: &Path,
    options: &ReadOptions,
) -> Result<Table> {
    let width = columns.len();
    for row in &mut raw_rows {
        row.resize(width, String::new());
    }

    let kinds: Vec<ColumnKind> = (0..width)
        .map(|idx| {
            if options.infer_numbers {
                infer_kind(raw_rows.iter().map(|row| row[idx].trim()))
            } else {
                ColumnKind::Text
            }
        })
        .collect();
    debug!(path = %path.display(), ?kinds, "inferred column kinds");

    let mut table = Table::new(columns)?;
    for row in raw_rows {
        let values = row
            .into_iter()
            .zip(&kinds)
            .map(|(raw, kind)| to_cell(raw, *kind))
            .collect();
        table.push_values(values)?;
    }
    Ok(table)
}

fn read_header<'a>(fields: impl Iterator<Item = &'a str>, path: &Path) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::new();
    for (index, raw) in fields.enumerate() {
        let name = normalize_header(raw);
        if name.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(name.clone()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name,
            });
        }
        columns.push(name);
    }
    Ok(columns)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// A column is numeric only if every non-empty value parses.
fn infer_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    let mut non_empty = 0usize;
    for value in values {
        if value.is_empty() {
            continue;
        }
        non_empty += 1;
        if value.parse::<i64>().is_ok() {
            continue;
        }
        match value.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => kind = ColumnKind::Float,
            _ => return ColumnKind::Text,
        }
    }
    if non_empty == 0 {
        ColumnKind::Text
    } else {
        kind
    }
}

/// Blank cells are missing; text cells keep their surrounding whitespace.
fn to_cell(raw: String, kind: ColumnKind) -> CellValue {
    if is_blank(&raw) {
        return CellValue::Missing;
    }
    match kind {
        ColumnKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map_or(CellValue::Text(raw), CellValue::Integer),
        ColumnKind::Float => match raw.trim().parse::<f64>() {
            Ok(value) => CellValue::Float(value),
            Err(_) => CellValue::Text(raw),
        },
        ColumnKind::Text => CellValue::Text(raw),
    }
}

/// Check file size against a limit.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Rejects files starting with a UTF-16 byte order mark.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            warn!(path = %path.display(), encoding, "rejecting non UTF-8 file");
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

fn workbook_error(path: &Path, source: calamine::Error) -> IngestError {
    IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}
