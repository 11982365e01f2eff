//! Delimited-text loading for the sales pipeline.
//!
//! Reads a UTF-8 file with a header row into a [`Table`], inferring a storage
//! type per column the way dataframe readers do.

use std::path::Path;

use sales_core::models::{ColumnType, Table, Value};
use sales_core::{PipelineError, Result};
use tracing::debug;

/// Cell contents treated as missing values.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` as a table called `name`.
///
/// Column types are inferred per column: all-integer columns become
/// [`Value::Integer`], all-numeric columns become [`Value::Float`], anything
/// else stays [`Value::Text`].  Missing markers become [`Value::Null`].
/// Header names are kept verbatim, surrounding whitespace included.
///
/// Errors:
/// * [`PipelineError::FileRead`] when the file is missing or unreadable.
/// * [`PipelineError::Parse`] for malformed structure (ragged rows, invalid
///   UTF-8).
/// * [`PipelineError::EmptyInput`] when there is no header row.
pub fn load_table(path: &Path, name: &str, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(PipelineError::EmptyInput(path.to_path_buf()));
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let types: Vec<ColumnType> = (0..columns.len())
        .map(|idx| infer_column_type(raw_rows.iter().map(|r| r[idx].as_str())))
        .collect();

    let rows: Vec<Vec<Value>> = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .zip(&types)
                .map(|(cell, kind)| convert_cell(cell, *kind))
                .collect()
        })
        .collect();

    debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        path.display()
    );

    Table::from_rows(name, columns, rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map a csv error onto the pipeline taxonomy: I/O failures are read errors,
/// everything else is a structural parse error.
fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    if err.is_io_error() {
        return PipelineError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(err),
        };
    }
    PipelineError::Parse {
        path: path.to_path_buf(),
        source: err,
    }
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Decide the storage type of a column from its raw cells.
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut all_int = true;
    let mut all_float = true;
    for cell in cells.filter(|c| !is_missing(c)) {
        let trimmed = cell.trim();
        if all_int && trimmed.parse::<i64>().is_err() {
            all_int = false;
        }
        if trimmed.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }
    if all_int {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn convert_cell(cell: String, kind: ColumnType) -> Value {
    if is_missing(&cell) {
        return Value::Null;
    }
    match kind {
        ColumnType::Integer => cell
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or(Value::Text(cell)),
        ColumnType::Float => cell
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(Value::Text(cell)),
        ColumnType::Text | ColumnType::DateTime => Value::Text(cell),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
