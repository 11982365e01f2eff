//! Batch pipeline orchestration.
//!
//! Runs load → clean → enrich → aggregate in order and returns a
//! [`PipelineOutput`] ready for the charts and the sink.  Every stage is a
//! whole-table transformation; the first error aborts the run.

use std::path::PathBuf;
use std::time::Instant;

use sales_core::models::{CategoryRevenue, MonthlyRevenue, SalesColumns, SalesRecord, Table};
use sales_core::settings::Settings;
use sales_core::Result;
use sales_data::aggregator::RevenueAggregator;
use sales_data::cleaner::{coerce_dates, normalize_emails};
use sales_data::enricher::add_line_revenue;
use sales_data::reader::load_table;
use tracing::{debug, info};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything a run produces before anything is written.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Customer table with ASCII-folded emails.
    pub customers: Table,
    /// Sales table with coerced dates and the line-revenue column.
    pub sales: Table,
    pub monthly: Vec<MonthlyRevenue>,
    pub categories: Vec<CategoryRevenue>,
    /// Sum of every non-null line revenue.
    pub total_revenue: f64,
}

// ── SalesPipeline ─────────────────────────────────────────────────────────────

/// Input locations and schema for one pipeline run.
#[derive(Debug, Clone)]
pub struct SalesPipeline {
    sales_file: PathBuf,
    customers_file: PathBuf,
    delimiter: u8,
    columns: SalesColumns,
    email_column: String,
    sales_table: String,
    customers_table: String,
}

impl SalesPipeline {
    pub fn new(sales_file: PathBuf, customers_file: PathBuf) -> Self {
        Self {
            sales_file,
            customers_file,
            delimiter: b',',
            columns: SalesColumns::default(),
            email_column: "email".to_string(),
            sales_table: "sales".to_string(),
            customers_table: "customers".to_string(),
        }
    }

    /// Build a pipeline from the command-line settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            sales_file: settings.sales_file.clone(),
            customers_file: settings.customers_file.clone(),
            delimiter: settings.delimiter_byte()?,
            columns: settings.sales_columns(),
            email_column: settings.email_column.clone(),
            sales_table: settings.sales_table.clone(),
            customers_table: settings.customers_table.clone(),
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_columns(mut self, columns: SalesColumns, email_column: impl Into<String>) -> Self {
        self.columns = columns;
        self.email_column = email_column.into();
        self
    }

    /// Run every in-memory stage.
    ///
    /// 1. Load both files.
    /// 2. Fold customer emails to ASCII and coerce sale dates.
    /// 3. Derive line revenue.
    /// 4. Aggregate revenue by month and by category.
    pub fn run(&self) -> Result<PipelineOutput> {
        let started = Instant::now();

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let customers = load_table(&self.customers_file, &self.customers_table, self.delimiter)?;
        let sales = load_table(&self.sales_file, &self.sales_table, self.delimiter)?;
        info!(
            "Loaded {} customers and {} sales rows",
            customers.len(),
            sales.len()
        );

        // ── Step 2: Clean ─────────────────────────────────────────────────────
        let customers = normalize_emails(customers, &self.email_column)?;
        let sales = coerce_dates(sales, &self.columns.sale_date)?;
        debug!("Cleaned emails and coerced '{}'", self.columns.sale_date);

        // ── Step 3: Enrich ────────────────────────────────────────────────────
        let sales = add_line_revenue(sales, &self.columns)?;

        // ── Step 4: Aggregate ─────────────────────────────────────────────────
        let records = SalesRecord::from_table(&sales, &self.columns)?;
        let monthly = RevenueAggregator::monthly(&records);
        let categories = RevenueAggregator::by_category(&records);
        let total_revenue = RevenueAggregator::total(&records);
        info!(
            "Aggregated {} months and {} categories, total revenue {:.2}",
            monthly.len(),
            categories.len(),
            total_revenue
        );

        debug!(
            "Transform stages finished in {:.3}s",
            started.elapsed().as_secs_f64()
        );

        Ok(PipelineOutput {
            customers,
            sales,
            monthly,
            categories,
            total_revenue,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
