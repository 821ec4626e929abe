// mrmark-core/src/domain/quality/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::dataset::DatasetKind;
use crate::domain::quality::dimension::Dimension;
use crate::domain::quality::issue::{QualityIssue, Severity};
use crate::domain::quality::metric::{QualityMetric, QualityStatus};

pub const ACCEPTABLE_QUALITY: &str =
    "Data quality is acceptable. Keep the current collection and cleansing process.";
pub const CHECK_INPUT_FORMAT: &str = "Verify the input data format and the source table.";

const CRITICAL_BANNER: &str = "Immediate action required: data quality is critical. Run validation and cleansing on the affected tables now.";
const HIGH_BANNER: &str =
    "Attention needed: data quality should be improved. A review of the data pipeline is recommended.";

/// Outcome of scoring one record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub collection_id: String,
    pub dataset_kind: DatasetKind,
    pub timestamp: DateTime<Utc>,
    pub total_records: usize,
    pub overall_score: f64,
    pub status: QualityStatus,
    pub metrics: BTreeMap<Dimension, f64>,
    pub details: Vec<QualityMetric>,
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<String>,
    /// Why the input could not be scored. Only set on degraded results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ValidationResult {
    /// Well-formed zero-score result for input that could not be scored.
    pub fn degraded(
        collection_id: &str,
        dataset_kind: DatasetKind,
        timestamp: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        Self {
            collection_id: collection_id.to_string(),
            dataset_kind,
            timestamp,
            total_records: 0,
            overall_score: 0.0,
            status: QualityStatus::Critical,
            metrics: BTreeMap::new(),
            details: Vec::new(),
            issues: vec![QualityIssue {
                severity: Severity::Critical,
                category: "input".to_string(),
                description: format!("Validation failed for '{}': {}", collection_id, reason),
                affected_records: 0,
                recommendation: CHECK_INPUT_FORMAT.to_string(),
            }],
            recommendations: vec![CHECK_INPUT_FORMAT.to_string()],
            failure: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    pub fn metric(&self, dimension: Dimension) -> Option<f64> {
        self.metrics.get(&dimension).copied()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Quality report across the warehouse tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseReport {
    pub timestamp: DateTime<Utc>,
    pub overall_score: f64,
    pub status: QualityStatus,
    pub table_quality: BTreeMap<String, ValidationResult>,
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl WarehouseReport {
    /// Aggregates per-table results. Degraded tables contribute their issue but
    /// are left out of the overall score.
    pub fn from_tables(timestamp: DateTime<Utc>, tables: Vec<ValidationResult>) -> Self {
        let scored: Vec<f64> = tables
            .iter()
            .filter(|r| !r.is_degraded())
            .map(|r| r.overall_score)
            .collect();
        let overall_score = if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        };

        let issues: Vec<QualityIssue> = tables
            .iter()
            .flat_map(|r| r.issues.iter().map(|issue| issue.scoped_to(&r.collection_id)))
            .collect();
        let recommendations = warehouse_recommendations(&issues);
        let summary = summarize(overall_score, &issues);

        Self {
            timestamp,
            overall_score,
            status: QualityStatus::from_score(overall_score),
            table_quality: tables
                .into_iter()
                .map(|r| (r.collection_id.clone(), r))
                .collect(),
            issues,
            recommendations,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn count_severity(issues: &[QualityIssue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

/// Banners first, then one line per category (first recommendation wins).
fn warehouse_recommendations(issues: &[QualityIssue]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if count_severity(issues, Severity::Critical) > 0 {
        recommendations.push(CRITICAL_BANNER.to_string());
    }
    if count_severity(issues, Severity::High) > 0 {
        recommendations.push(HIGH_BANNER.to_string());
    }

    let mut seen = std::collections::HashSet::new();
    for issue in issues {
        if seen.insert(issue.category.as_str()) {
            recommendations.push(format!("{}: {}", issue.category, issue.recommendation));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(ACCEPTABLE_QUALITY.to_string());
    }
    recommendations
}

fn summarize(overall_score: f64, issues: &[QualityIssue]) -> String {
    format!(
        "Overall quality score: {:.3} ({}). {} critical issue(s), {} high issue(s) found.",
        overall_score,
        QualityStatus::from_score(overall_score),
        count_severity(issues, Severity::Critical),
        count_severity(issues, Severity::High),
    )
}
