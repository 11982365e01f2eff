//! Column-wise cleaning: email ASCII folding and sales-date coercion.

use sales_core::dates::parse_datetime;
use sales_core::models::{Table, Value};
use sales_core::{PipelineError, Result};
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Fold a string to ASCII.
///
/// Applies NFKD so accented letters split into a base letter plus combining
/// marks, then drops every non-ASCII character.  Symbols without an ASCII
/// decomposition disappear rather than being substituted.
pub fn normalize_email(email: &str) -> String {
    email.nfkd().filter(char::is_ascii).collect()
}

/// Normalize every value of the email `column` with [`normalize_email`].
///
/// `Null` cells pass through.  Non-text cells have no text to normalize and
/// become `Null`.
pub fn normalize_emails(table: Table, column: &str) -> Result<Table> {
    let mut coerced = 0usize;
    let table = table.map_column(column, |_, cell| {
        Ok(match cell {
            Value::Text(s) => Value::Text(normalize_email(&s)),
            Value::Null => Value::Null,
            _ => {
                coerced += 1;
                Value::Null
            }
        })
    })?;
    if coerced > 0 {
        warn!(
            "{} non-text values in '{}' replaced with nulls",
            coerced, column
        );
    }
    Ok(table)
}

/// Convert the date `column` from text to date-times.
///
/// Aborts on the first value that matches no supported format with
/// [`PipelineError::DateParse`]; no row-level recovery is attempted.  `Null`
/// cells stay `Null` and already-coerced cells are kept as they are.
pub fn coerce_dates(table: Table, column: &str) -> Result<Table> {
    table.map_column(column, |row, cell| match cell {
        Value::Null => Ok(Value::Null),
        Value::DateTime(dt) => Ok(Value::DateTime(dt)),
        other => {
            let text = other.render(false);
            parse_datetime(&text)
                .map(Value::DateTime)
                .ok_or_else(|| PipelineError::DateParse {
                    column: column.to_string(),
                    row,
                    value: text,
                })
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
