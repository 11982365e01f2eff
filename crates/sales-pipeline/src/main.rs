mod bootstrap;

use anyhow::{Context, Result};
use sales_core::formatting::format_revenue;
use sales_core::settings::{redact_url, Settings};
use sales_runtime::database::Database;
use sales_runtime::orchestrator::SalesPipeline;
use sales_runtime::sink::Sink;
use sales_ui::app::{dashboard_mode, ChartApp, DashboardMode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_file = bootstrap::load_env();
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Sales pipeline v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Resolve credentials before doing any work so a misconfigured run fails
    // without touching the outputs.
    let database_url = if settings.skip_database {
        None
    } else {
        Some(settings.database.connection_url()?)
    };

    let pipeline = SalesPipeline::from_settings(&settings)?;
    let sink = Sink::from_settings(&settings)?;

    let output = pipeline.run()?;
    tracing::info!(
        "Total revenue {} across {} sales rows",
        format_revenue(output.total_revenue),
        output.sales.len()
    );

    match dashboard_mode(settings.no_charts) {
        DashboardMode::Show => ChartApp::new(&settings.theme)
            .run(&output.monthly, &output.categories, output.total_revenue)
            .context("chart dashboard failed")?,
        DashboardMode::Disabled => tracing::debug!("Chart dashboard disabled"),
        DashboardMode::NoTerminal => {
            tracing::warn!("No terminal attached, skipping chart dashboard")
        }
    }

    sink.write_files(&output)?;

    match database_url {
        Some(url) => {
            let mut db = Database::connect(&url).await?;
            sink.write_database(&mut db, &output).await?;
            db.close().await?;
            tracing::info!("Database load finished ({})", redact_url(&url));
        }
        None => tracing::info!("Skipping database load"),
    }

    println!("Data pipeline completed successfully.");
    Ok(())
}
