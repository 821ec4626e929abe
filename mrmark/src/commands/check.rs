// mrmark/src/commands/check.rs
//
// USE CASE: Score collected JSON files.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table;
use mrmark_core::DatasetKind;
use mrmark_core::application::{FileCheckOutcome, check_files};
use mrmark_core::domain::quality::{Dimension, QualityScorer, ValidationResult};
use mrmark_core::infrastructure::discovery::discover_data_files;
use mrmark_core::infrastructure::report::ReportStore;
use tracing::info;

use super::{fmt_score, load_config, resolve};
use crate::cli::OutputFormat;

pub fn execute(
    files: Vec<PathBuf>,
    data_dir: Option<PathBuf>,
    kind: DatasetKind,
    project_dir: PathBuf,
    no_report: bool,
    format: OutputFormat,
    fail_under: Option<f64>,
) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let scorer = QualityScorer::new(&config.quality).context("Invalid quality configuration")?;

    let files = if files.is_empty() {
        let dir = data_dir.unwrap_or_else(|| resolve(&project_dir, &config.data_path));
        let found = discover_data_files(&dir)
            .with_context(|| format!("Failed to scan data directory {:?}", dir))?;
        if found.is_empty() {
            anyhow::bail!("No JSON files found in {}", dir.display());
        }
        found
    } else {
        files
    };

    info!(files = files.len(), kind = %kind, "Checking data files");
    let store = (!no_report).then(|| ReportStore::new(resolve(&project_dir, &config.reports_path)));
    let outcomes = check_files(&scorer, kind, &files, store.as_ref());

    match format {
        OutputFormat::Json => {
            let results: Vec<&ValidationResult> = outcomes.iter().map(|o| &o.result).collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Table => print_table(&outcomes),
    }

    if let Some(threshold) = fail_under {
        let failing: Vec<&FileCheckOutcome> = outcomes
            .iter()
            .filter(|o| o.result.overall_score < threshold)
            .collect();
        if !failing.is_empty() {
            for outcome in &failing {
                eprintln!(
                    "❌ {}: overall score {} is below {}",
                    outcome.result.collection_id,
                    fmt_score(outcome.result.overall_score),
                    threshold
                );
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_table(outcomes: &[FileCheckOutcome]) {
    let mut table = Table::new();
    let mut header = vec!["File".to_string(), "Records".to_string()];
    header.extend(Dimension::ALL.iter().map(|d| d.to_string()));
    header.extend(["Overall".to_string(), "Status".to_string()]);
    table.set_header(header);

    for outcome in outcomes {
        let result = &outcome.result;
        let mut row = vec![result.collection_id.clone(), result.total_records.to_string()];
        row.extend(Dimension::ALL.iter().map(|d| {
            result
                .metric(*d)
                .map(fmt_score)
                .unwrap_or_else(|| "-".to_string())
        }));
        row.extend([fmt_score(result.overall_score), result.status.to_string()]);
        table.add_row(row);
    }
    println!("{table}");

    for outcome in outcomes {
        let result = &outcome.result;
        if !result.issues.is_empty() {
            println!("\n{}:", result.collection_id);
            for issue in &result.issues {
                println!("   [{}] {}", issue.severity, issue.description);
            }
            for recommendation in &result.recommendations {
                println!("   ➜ {}", recommendation);
            }
        }
        if let Some(path) = &outcome.report_path {
            println!("📄 Report saved to {}", path.display());
        }
    }
}
