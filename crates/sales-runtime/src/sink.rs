//! Output stage: delimited-text files first, then the relational store.
//!
//! Both writes are full replacements.  There is no rollback across the two
//! steps, so a database failure leaves the files already written.

use std::path::PathBuf;

use sales_core::settings::Settings;
use sales_core::{PipelineError, Result};
use sales_data::writer::{write_records_csv, write_table_csv};
use tracing::info;

use crate::database::Database;
use crate::orchestrator::PipelineOutput;

/// File name of the monthly aggregate inside the export directory.
pub const MONTHLY_EXPORT_FILE: &str = "monthly_revenue.csv";
/// File name of the category aggregate inside the export directory.
pub const CATEGORY_EXPORT_FILE: &str = "category_revenue.csv";

/// Destinations for one pipeline run.
#[derive(Debug, Clone)]
pub struct Sink {
    pub sales_output: PathBuf,
    pub customers_output: PathBuf,
    pub export_dir: Option<PathBuf>,
    pub delimiter: u8,
    pub sales_table: String,
    pub customers_table: String,
}

impl Sink {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            sales_output: settings.sales_output.clone(),
            customers_output: settings.customers_output.clone(),
            export_dir: settings.export_dir.clone(),
            delimiter: settings.delimiter_byte()?,
            sales_table: settings.sales_table.clone(),
            customers_table: settings.customers_table.clone(),
        })
    }

    /// Write the cleaned tables, plus the aggregates when an export
    /// directory is configured.  Existing files are overwritten.
    pub fn write_files(&self, output: &PipelineOutput) -> Result<()> {
        write_table_csv(&output.customers, &self.customers_output, self.delimiter)?;
        write_table_csv(&output.sales, &self.sales_output, self.delimiter)?;
        info!(
            "Wrote {} and {}",
            self.customers_output.display(),
            self.sales_output.display()
        );

        if let Some(dir) = &self.export_dir {
            std::fs::create_dir_all(dir).map_err(|source| PipelineError::FileWrite {
                path: dir.clone(),
                source,
            })?;
            write_records_csv(&output.monthly, &dir.join(MONTHLY_EXPORT_FILE))?;
            write_records_csv(&output.categories, &dir.join(CATEGORY_EXPORT_FILE))?;
            info!("Exported aggregates to {}", dir.display());
        }
        Ok(())
    }

    /// Replace the customer and sales tables in `db`.
    pub async fn write_database(&self, db: &mut Database, output: &PipelineOutput) -> Result<()> {
        let customers = db
            .replace_table(&self.customers_table, &output.customers)
            .await?;
        let sales = db.replace_table(&self.sales_table, &output.sales).await?;
        info!(
            "Loaded {} rows into '{}' and {} rows into '{}'",
            customers, self.customers_table, sales, self.sales_table
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SalesPipeline;
    use sqlx::Row;
    use std::path::Path;
    use tempfile::TempDir;

    fn run_pipeline(dir: &Path) -> PipelineOutput {
        let sales = dir.join("sales.csv");
        let customers = dir.join("customers.csv");
        std::fs::write(
            &sales,
            "sale_date,quantity,unit_price,category\n\
             2024-01-15,2,10.0,A\n\
             2024-01-20,1,5.0,B\n\
             2024-02-01,3,10.0,A\n",
        )
        .unwrap();
        std::fs::write(&customers, "name,email\nJoão,joão@ex.com\n").unwrap();
        SalesPipeline::new(sales, customers).run().unwrap()
    }

    fn sink(dir: &Path, export_dir: Option<PathBuf>) -> Sink {
        Sink {
            sales_output: dir.join("sales_clean.csv"),
            customers_output: dir.join("customers_clean.csv"),
            export_dir,
            delimiter: b',',
            sales_table: "sales".into(),
            customers_table: "customers".into(),
        }
    }

    // ── write_files ───────────────────────────────────────────────────────────

    #[test]
    fn test_write_files() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        let sink = sink(dir.path(), None);

        sink.write_files(&output).unwrap();

        assert_eq!(
            std::fs::read_to_string(&sink.sales_output).unwrap(),
            "sale_date,quantity,unit_price,category,line_revenue\n\
             2024-01-15,2,10.0,A,20.0\n\
             2024-01-20,1,5.0,B,5.0\n\
             2024-02-01,3,10.0,A,30.0\n"
        );
        assert_eq!(
            std::fs::read_to_string(&sink.customers_output).unwrap(),
            "name,email\nJoão,joao@ex.com\n"
        );
        assert!(!dir.path().join(MONTHLY_EXPORT_FILE).exists());
    }

    #[test]
    fn test_write_files_twice_is_identical() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        let sink = sink(dir.path(), None);

        sink.write_files(&output).unwrap();
        let first = std::fs::read(&sink.sales_output).unwrap();
        sink.write_files(&output).unwrap();
        let second = std::fs::read(&sink.sales_output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_files_exports_aggregates() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        let export_dir = dir.path().join("reports");
        let sink = sink(dir.path(), Some(export_dir.clone()));

        sink.write_files(&output).unwrap();

        assert_eq!(
            std::fs::read_to_string(export_dir.join(MONTHLY_EXPORT_FILE)).unwrap(),
            "month_start,total_revenue\n2024-01-01,25.0\n2024-02-01,30.0\n"
        );
        assert_eq!(
            std::fs::read_to_string(export_dir.join(CATEGORY_EXPORT_FILE)).unwrap(),
            "category,total_revenue\nA,50.0\nB,5.0\n"
        );
    }

    #[test]
    fn test_write_files_exports_headers_for_empty_sales() {
        let dir = TempDir::new().unwrap();
        let sales = dir.path().join("sales.csv");
        let customers = dir.path().join("customers.csv");
        std::fs::write(&sales, "sale_date,quantity,unit_price,category\n").unwrap();
        std::fs::write(&customers, "name,email\n").unwrap();
        let output = SalesPipeline::new(sales, customers).run().unwrap();

        let export_dir = dir.path().join("reports");
        let sink = sink(dir.path(), Some(export_dir.clone()));
        sink.write_files(&output).unwrap();

        assert_eq!(
            std::fs::read_to_string(export_dir.join(MONTHLY_EXPORT_FILE)).unwrap(),
            "month_start,total_revenue\n"
        );
        assert_eq!(
            std::fs::read_to_string(export_dir.join(CATEGORY_EXPORT_FILE)).unwrap(),
            "category,total_revenue\n"
        );
    }

    #[test]
    fn test_write_files_export_dir_error_names_directory() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        // A regular file where the export directory should go.
        let blocker = dir.path().join("reports");
        std::fs::write(&blocker, "not a directory").unwrap();
        let sink = sink(dir.path(), Some(blocker.join("nested")));

        let err = sink.write_files(&output).unwrap_err();
        match err {
            PipelineError::FileWrite { path, .. } => assert_eq!(path, blocker.join("nested")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ── write_database ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_write_database_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        let sink = sink(dir.path(), None);
        let mut db = Database::connect("sqlite::memory:").await.unwrap();

        sink.write_database(&mut db, &output).await.unwrap();
        sink.write_database(&mut db, &output).await.unwrap();

        let rows: Vec<(String, f64)> =
            sqlx::query("SELECT category, line_revenue FROM sales ORDER BY rowid")
                .fetch_all(db.connection_mut())
                .await
                .unwrap()
                .iter()
                .map(|r| (r.try_get(0).unwrap(), r.try_get(1).unwrap()))
                .collect();
        assert_eq!(
            rows,
            vec![
                ("A".to_string(), 20.0),
                ("B".to_string(), 5.0),
                ("A".to_string(), 30.0)
            ]
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_database_customers_are_clean() {
        let dir = TempDir::new().unwrap();
        let output = run_pipeline(dir.path());
        let sink = sink(dir.path(), None);
        let mut db = Database::connect("sqlite::memory:").await.unwrap();

        sink.write_database(&mut db, &output).await.unwrap();

        let email: String = sqlx::query("SELECT email FROM customers")
            .fetch_one(db.connection_mut())
            .await
            .unwrap()
            .try_get(0)
            .unwrap();
        assert_eq!(email, "joao@ex.com");
    }
}
