//! Revenue aggregation by calendar month and by category.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sales_core::dates::month_start;
use sales_core::models::{CategoryRevenue, MonthlyRevenue, SalesRecord};

// ── RevenueAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups sales records and sums their line revenue.
///
/// Both groupings are total-preserving partitions of the records that carry
/// a grouping key; null revenues contribute nothing to any sum.
pub struct RevenueAggregator;

impl RevenueAggregator {
    /// Sum revenue per calendar month, ascending by month start.
    ///
    /// Months without sales are absent.  Records without a date are skipped.
    pub fn monthly(records: &[SalesRecord]) -> Vec<MonthlyRevenue> {
        // BTreeMap keeps the months sorted.
        let mut map: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for record in records {
            let Some(sale_date) = record.sale_date else {
                continue;
            };
            *map.entry(month_start(sale_date)).or_insert(0.0) +=
                record.line_revenue.unwrap_or(0.0);
        }

        map.into_iter()
            .map(|(month_start, total_revenue)| MonthlyRevenue {
                month_start,
                total_revenue,
            })
            .collect()
    }

    /// Sum revenue per exact category label, descending by total.
    ///
    /// Categories with equal totals keep the order in which they first appear
    /// in `records`.  Records without a category are skipped.
    pub fn by_category(records: &[SalesRecord]) -> Vec<CategoryRevenue> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<CategoryRevenue> = Vec::new();

        for record in records {
            let Some(category) = record.category.as_deref() else {
                continue;
            };
            let idx = *positions.entry(category).or_insert_with(|| {
                groups.push(CategoryRevenue {
                    category: category.to_string(),
                    total_revenue: 0.0,
                });
                groups.len() - 1
            });
            groups[idx].total_revenue += record.line_revenue.unwrap_or(0.0);
        }

        // `sort_by` is stable, so ties keep first-appearance order.
        groups.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
        groups
    }

    /// Sum of every non-null line revenue.
    pub fn total(records: &[SalesRecord]) -> f64 {
        records.iter().filter_map(|r| r.line_revenue).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
