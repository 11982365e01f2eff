use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::error::{PipelineError, Result};

// ── Value ─────────────────────────────────────────────────────────────────────

/// A single typed cell of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value (empty cell or a recognised missing marker).
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Borrow the text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret the cell as a number for arithmetic.
    ///
    /// `Null` yields `Ok(None)`.  Integer and float cells convert directly and
    /// numeric-looking text is parsed.  Anything else is an
    /// [`PipelineError::InvalidNumber`] attributed to `column` / `row`.
    pub fn to_number(&self, column: &str, row: usize) -> Result<Option<f64>> {
        let invalid = |value: String| PipelineError::InvalidNumber {
            column: column.to_string(),
            row,
            value,
        };
        match self {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(*i as f64)),
            Value::Float(f) => Ok(Some(*f)),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| invalid(s.clone())),
            Value::DateTime(dt) => Err(invalid(dates::format_datetime(dt, false))),
        }
    }

    /// Render the cell as it is written to delimited text.
    ///
    /// `Null` renders as an empty string; floats use the shortest
    /// round-trip representation (`25.0`, `0.1`).
    pub fn render(&self, date_only: bool) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format!("{:?}", f),
            Value::Text(s) => s.clone(),
            Value::DateTime(dt) => dates::format_datetime(dt, date_only),
        }
    }
}

// ── ColumnType ────────────────────────────────────────────────────────────────

/// The storage type of a column, derived from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    DateTime,
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// A named, row-oriented table of typed cells.
///
/// Every row has exactly one cell per column.  Transformations take the table
/// by value and hand back the transformed table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from a header and rows.
    ///
    /// Returns [`PipelineError::Config`] when any row length differs from the
    /// header length.
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(pos) = rows.iter().position(|r| r.len() != columns.len()) {
            return Err(PipelineError::Config(format!(
                "table '{}' row {} has {} cells, expected {}",
                name,
                pos,
                rows[pos].len(),
                columns.len()
            )));
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header, failing fast when absent.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| PipelineError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Iterate over the cells of `column`, top to bottom.
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Replace every cell of an existing column with `f(row_index, cell)`.
    ///
    /// Stops at the first error returned by `f`.
    pub fn map_column<F>(mut self, column: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, Value) -> Result<Value>,
    {
        let idx = self.column_index(column)?;
        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            let cell = std::mem::replace(&mut row[idx], Value::Null);
            row[idx] = f(row_idx, cell)?;
        }
        Ok(self)
    }

    /// Overwrite `column` with `values`, appending it as the last column when
    /// it does not exist yet.
    pub fn with_column(mut self, column: &str, values: Vec<Value>) -> Result<Self> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::Config(format!(
                "column '{}' has {} values but table '{}' has {} rows",
                column,
                values.len(),
                self.name,
                self.rows.len()
            )));
        }
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(self)
    }

    /// Storage type of the column at `idx`.
    ///
    /// Integer and float cells together make a float column; any text cell
    /// makes a text column; a column with no non-null cells is text.
    pub fn column_type(&self, idx: usize) -> ColumnType {
        let mut kind: Option<ColumnType> = None;
        for row in &self.rows {
            let cell_kind = match &row[idx] {
                Value::Null => continue,
                Value::Integer(_) => ColumnType::Integer,
                Value::Float(_) => ColumnType::Float,
                Value::Text(_) => return ColumnType::Text,
                Value::DateTime(_) => ColumnType::DateTime,
            };
            kind = Some(match (kind, cell_kind) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }
        kind.unwrap_or(ColumnType::Text)
    }

    /// `true` when every non-null date-time in the column falls on midnight,
    /// so the column can be written without a time component.
    pub fn is_date_only(&self, idx: usize) -> bool {
        self.rows.iter().all(|row| match &row[idx] {
            Value::DateTime(dt) => dates::is_midnight(dt),
            _ => true,
        })
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Names of the sales-table columns the pipeline depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesColumns {
    pub sale_date: String,
    pub quantity: String,
    pub unit_price: String,
    pub category: String,
    /// Derived column written by the enricher.
    pub line_revenue: String,
}

impl Default for SalesColumns {
    fn default() -> Self {
        Self {
            sale_date: "sale_date".to_string(),
            quantity: "quantity".to_string(),
            unit_price: "unit_price".to_string(),
            category: "category".to_string(),
            line_revenue: "line_revenue".to_string(),
        }
    }
}

// ── SalesRecord ───────────────────────────────────────────────────────────────

/// Typed view of one row of the enriched sales table.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// 0-based position in the sales table.
    pub row: usize,
    pub sale_date: Option<NaiveDateTime>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub line_revenue: Option<f64>,
}

impl SalesRecord {
    /// Extract typed records from an enriched sales table.
    ///
    /// Fails with [`PipelineError::MissingColumn`] when any column named in
    /// `columns` is absent, with [`PipelineError::UnexpectedType`] when the
    /// date column still holds text (dates were not coerced), and with
    /// [`PipelineError::InvalidNumber`] for non-numeric amounts.
    pub fn from_table(table: &Table, columns: &SalesColumns) -> Result<Vec<Self>> {
        let date_idx = table.column_index(&columns.sale_date)?;
        let qty_idx = table.column_index(&columns.quantity)?;
        let price_idx = table.column_index(&columns.unit_price)?;
        let cat_idx = table.column_index(&columns.category)?;
        let rev_idx = table.column_index(&columns.line_revenue)?;

        table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let sale_date = match &cells[date_idx] {
                    Value::Null => None,
                    Value::DateTime(dt) => Some(*dt),
                    _ => {
                        return Err(PipelineError::UnexpectedType {
                            column: columns.sale_date.clone(),
                            row,
                            expected: "a date",
                        })
                    }
                };
                let category = match &cells[cat_idx] {
                    Value::Null => None,
                    other => Some(other.render(false)),
                };
                Ok(SalesRecord {
                    row,
                    sale_date,
                    quantity: cells[qty_idx].to_number(&columns.quantity, row)?,
                    unit_price: cells[price_idx].to_number(&columns.unit_price, row)?,
                    category,
                    line_revenue: cells[rev_idx].to_number(&columns.line_revenue, row)?,
                })
            })
            .collect()
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// A row type exported as delimited text with a fixed header.
pub trait ExportRecord: Serialize {
    /// Column names, in serialization order.
    const HEADER: &'static [&'static str];
}

/// Revenue summed over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// First day of the month.
    pub month_start: NaiveDate,
    pub total_revenue: f64,
}

/// Revenue summed over one category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub total_revenue: f64,
}

impl ExportRecord for MonthlyRevenue {
    const HEADER: &'static [&'static str] = &["month_start", "total_revenue"];
}

impl ExportRecord for CategoryRevenue {
    const HEADER: &'static [&'static str] = &["category", "total_revenue"];
}

// ── Tests ─────────────────────────────────────────────────────────────────────
