//! Delimited-text output for cleaned tables and aggregate exports.

use std::path::Path;

use sales_core::models::{ColumnType, ExportRecord, Table};
use sales_core::{PipelineError, Result};
use tracing::debug;

/// Write `table` to `path`, replacing any existing file.
///
/// The header row is always written, even for an empty table.  Date-time
/// columns are rendered as `YYYY-MM-DD` when every value is at midnight and
/// as `YYYY-MM-DD HH:MM:SS` otherwise.  Nulls become empty fields.
pub fn write_table_csv(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| write_error(path, e))?;

    writer
        .write_record(table.columns())
        .map_err(|e| write_error(path, e))?;

    let date_only: Vec<bool> = (0..table.columns().len())
        .map(|idx| table.column_type(idx) == ColumnType::DateTime && table.is_date_only(idx))
        .collect();

    for row in table.rows() {
        let fields = row
            .iter()
            .zip(&date_only)
            .map(|(cell, date_only)| cell.render(*date_only));
        writer
            .write_record(fields)
            .map_err(|e| write_error(path, e))?;
    }

    writer.flush().map_err(|source| PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Wrote {} rows of '{}' to {}",
        table.len(),
        table.name(),
        path.display()
    );
    Ok(())
}

/// Serialize `records` to `path` under `T::HEADER`.
///
/// The header is written even when `records` is empty.
pub fn write_records_csv<T: ExportRecord>(records: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| write_error(path, e))?;
    writer
        .write_record(T::HEADER)
        .map_err(|e| write_error(path, e))?;
    for record in records {
        writer.serialize(record).map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|source| PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn write_error(path: &Path, err: csv::Error) -> PipelineError {
    let source = if err.is_io_error() {
        std::io::Error::from(err)
    } else {
        std::io::Error::other(err.to_string())
    };
    PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
