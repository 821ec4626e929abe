// mrmark/src/commands/report.rs
//
// USE CASE: Warehouse-wide quality report.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table;
use mrmark_core::application::generate_warehouse_report;
use mrmark_core::domain::quality::QualityScorer;
use mrmark_core::infrastructure::adapters::DuckDBConnector;
use mrmark_core::infrastructure::report::ReportStore;
use mrmark_core::{DatasetKind, WarehouseReport};
use tracing::info;

use super::{fmt_score, load_config, resolve};
use crate::cli::OutputFormat;

pub async fn execute(
    project_dir: PathBuf,
    db_path: Option<PathBuf>,
    tables: Vec<DatasetKind>,
    format: OutputFormat,
    no_report: bool,
) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let scorer = QualityScorer::new(&config.quality).context("Invalid quality configuration")?;

    let db_path = db_path.unwrap_or_else(|| resolve(&project_dir, &config.warehouse_path));
    if !db_path.exists() {
        anyhow::bail!(
            "❌ Warehouse not found at: {}\n👉 Load the warehouse first or pass --db-path.",
            db_path.display()
        );
    }
    info!(path = ?db_path, "Opening warehouse");
    let connector = DuckDBConnector::new(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open DuckDB at {}", db_path.display()))?;

    let tables = if tables.is_empty() {
        DatasetKind::WAREHOUSE_TABLES.to_vec()
    } else {
        tables
    };

    let report = generate_warehouse_report(&connector, &scorer, &tables).await;

    let saved = if no_report {
        None
    } else {
        let store = ReportStore::new(resolve(&project_dir, &config.reports_path));
        Some(
            store
                .write_warehouse(&report)
                .context("Failed to write warehouse report")?,
        )
    };

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print_table(&report),
    }
    if let Some(path) = saved {
        eprintln!("📄 Report saved to {}", path.display());
    }

    Ok(())
}

fn print_table(report: &WarehouseReport) {
    let mut table = Table::new();
    table.set_header(vec!["Table", "Records", "Overall", "Status", "Issues"]);
    for (name, result) in &report.table_quality {
        let records = if result.is_degraded() {
            "-".to_string()
        } else {
            result.total_records.to_string()
        };
        table.add_row(vec![
            name.clone(),
            records,
            fmt_score(result.overall_score),
            result.status.to_string(),
            result.issues.len().to_string(),
        ]);
    }
    println!("{table}");

    println!("\n📊 {}", report.summary);
    for recommendation in &report.recommendations {
        println!("   ➜ {}", recommendation);
    }
}
