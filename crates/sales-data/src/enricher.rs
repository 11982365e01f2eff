//! Derived columns for the sales table.

use sales_core::models::{SalesColumns, Table, Value};
use sales_core::Result;

/// Add (or overwrite) the line-revenue column as `quantity * unit_price`.
///
/// Plain `f64` arithmetic with no rounding.  A `Null` operand yields a `Null`
/// revenue; a non-numeric operand aborts with
/// [`sales_core::PipelineError::InvalidNumber`].  Any existing values in the
/// revenue column are ignored and replaced.
pub fn add_line_revenue(table: Table, columns: &SalesColumns) -> Result<Table> {
    let qty_idx = table.column_index(&columns.quantity)?;
    let price_idx = table.column_index(&columns.unit_price)?;

    let revenue = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let quantity = cells[qty_idx].to_number(&columns.quantity, row)?;
            let unit_price = cells[price_idx].to_number(&columns.unit_price, row)?;
            Ok(match (quantity, unit_price) {
                (Some(q), Some(p)) => Value::Float(q * p),
                _ => Value::Null,
            })
        })
        .collect::<Result<Vec<Value>>>()?;

    table.with_column(&columns.line_revenue, revenue)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
