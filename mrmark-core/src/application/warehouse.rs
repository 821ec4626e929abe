// mrmark-core/src/application/warehouse.rs

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::domain::dataset::DatasetKind;
use crate::domain::quality::{QualityScorer, ValidationResult, WarehouseReport};
use crate::ports::connector::Connector;

/// Scores every requested warehouse table and aggregates the results.
///
/// A table that is missing or cannot be read shows up as a degraded entry and
/// is left out of the overall score.
pub async fn generate_warehouse_report(
    connector: &dyn Connector,
    scorer: &QualityScorer,
    tables: &[DatasetKind],
) -> WarehouseReport {
    generate_warehouse_report_at(connector, scorer, tables, Utc::now()).await
}

#[instrument(skip(connector, scorer), fields(engine = connector.engine_name()))]
pub async fn generate_warehouse_report_at(
    connector: &dyn Connector,
    scorer: &QualityScorer,
    tables: &[DatasetKind],
    now: DateTime<Utc>,
) -> WarehouseReport {
    let mut results = Vec::with_capacity(tables.len());
    for &kind in tables {
        results.push(score_table(connector, scorer, kind, now).await);
    }

    let report = WarehouseReport::from_tables(now, results);
    info!(
        score = report.overall_score,
        status = %report.status,
        tables = report.table_quality.len(),
        issues = report.issues.len(),
        "Warehouse report generated"
    );
    report
}

async fn score_table(
    connector: &dyn Connector,
    scorer: &QualityScorer,
    kind: DatasetKind,
    now: DateTime<Utc>,
) -> ValidationResult {
    let table = kind.as_str();

    match connector.table_exists(table).await {
        Ok(true) => {}
        Ok(false) => {
            return scorer.degraded(table, kind, format!("table '{}' does not exist", table));
        }
        Err(e) => return scorer.degraded(table, kind, e.to_string()),
    }

    match connector.fetch_records(table).await {
        Ok(records) => scorer.score_at(table, kind, &records, now),
        Err(e) => scorer.degraded(table, kind, e.to_string()),
    }
}
