// mrmark/src/commands/rules.rs
//
// USE CASE: Show the effective quality rules.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table;
use mrmark_core::DatasetKind;
use mrmark_core::domain::quality::{Dimension, QualityScorer};

use super::load_config;

pub fn execute(project_dir: PathBuf, kind: Option<DatasetKind>) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let scorer = QualityScorer::new(&config.quality).context("Invalid quality configuration")?;

    let mut thresholds = Table::new();
    thresholds.set_header(vec!["Dimension", "Threshold", "Weight", "Description"]);
    for rule in scorer.rules().iter() {
        thresholds.add_row(vec![
            rule.name.to_string(),
            format!("{:.2}", rule.threshold),
            format!("{:.2}", rule.weight),
            rule.description.clone(),
        ]);
    }
    println!("{thresholds}");
    println!(
        "Freshness window: {}s",
        scorer.freshness_window().num_seconds()
    );

    let kinds = match kind {
        Some(kind) => vec![kind],
        None => DatasetKind::ALL.to_vec(),
    };
    for kind in kinds {
        let Some(rules) = scorer.catalog().rules(kind) else {
            continue;
        };
        println!(
            "\n📏 {} (id: {}, timestamp: {})",
            kind,
            rules.id_field().unwrap_or("-"),
            rules.timestamp_field().unwrap_or("-")
        );

        let mut checks = Table::new();
        checks.set_header(vec!["Dimension", "Check"]);
        for dimension in Dimension::ALL {
            for check in rules.checks_for(dimension) {
                checks.add_row(vec![dimension.to_string(), check.check().to_string()]);
            }
        }
        println!("{checks}");
    }

    Ok(())
}
