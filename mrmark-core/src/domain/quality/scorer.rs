// mrmark-core/src/domain/quality/scorer.rs

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::dataset::DatasetKind;
use crate::domain::error::DomainError;
use crate::domain::quality::catalog::RuleCatalog;
use crate::domain::quality::dimension::Dimension;
use crate::domain::quality::issue::QualityIssue;
use crate::domain::quality::metric::{QualityMetric, QualityStatus};
use crate::domain::quality::report::{ACCEPTABLE_QUALITY, ValidationResult};
use crate::domain::quality::rule::{DEFAULT_FRESHNESS_WINDOW_SECS, QualityConfig, QualityRuleSet};
use crate::domain::quality::validator::{DimensionScores, DimensionValidator};
use crate::domain::record::RecordCollection;

/// Scores record collections against the configured thresholds and dataset rules.
///
/// Construction is the only fallible step. Every `score*` call returns a
/// `ValidationResult`; input that cannot be scored yields a degraded result.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    rules: QualityRuleSet,
    catalog: RuleCatalog,
    freshness_window: Duration,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self {
            rules: QualityRuleSet::default(),
            catalog: RuleCatalog::default(),
            freshness_window: Duration::seconds(DEFAULT_FRESHNESS_WINDOW_SECS as i64),
        }
    }
}

impl QualityScorer {
    pub fn new(config: &QualityConfig) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;

        let window_secs = i64::try_from(config.freshness_window_secs).map_err(|_| {
            DomainError::InvalidConfig(format!(
                "freshness_window_secs {} is too large",
                config.freshness_window_secs
            ))
        })?;
        let freshness_window = Duration::try_seconds(window_secs).ok_or_else(|| {
            DomainError::InvalidConfig(format!(
                "freshness_window_secs {} is out of range",
                window_secs
            ))
        })?;

        Ok(Self {
            rules: QualityRuleSet::with_overrides(&config.rules)?,
            catalog: RuleCatalog::compile(&config.datasets)?,
            freshness_window,
        })
    }

    pub fn rules(&self) -> &QualityRuleSet {
        &self.rules
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    pub fn score(
        &self,
        collection_id: &str,
        kind: DatasetKind,
        collection: &RecordCollection,
    ) -> ValidationResult {
        self.score_at(collection_id, kind, collection, Utc::now())
    }

    /// Scores `collection` with `now` as the reference instant for timeliness.
    pub fn score_at(
        &self,
        collection_id: &str,
        kind: DatasetKind,
        collection: &RecordCollection,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        let Some(validator) = self.catalog.validator(kind, self.freshness_window) else {
            return self.degraded_at(
                collection_id,
                kind,
                now,
                format!("no rules registered for dataset kind '{}'", kind),
            );
        };

        let records = collection.records();
        let scores = if records.is_empty() {
            DimensionScores::default()
        } else {
            validator.evaluate(records, now)
        };
        debug!(collection = collection_id, kind = %kind, ?scores, "Dimension scores");

        let overall_score = scores.overall(&self.rules);
        let details: Vec<QualityMetric> = scores
            .iter()
            .map(|(dim, value)| QualityMetric::new(dim, value, self.rules.threshold(dim)))
            .collect();
        let issues: Vec<QualityIssue> = scores
            .iter()
            .filter_map(|(dim, value)| {
                QualityIssue::below_threshold(dim, value, self.rules.threshold(dim), records.len())
            })
            .collect();
        let recommendations = recommendations_for(&issues);

        let result = ValidationResult {
            collection_id: collection_id.to_string(),
            dataset_kind: kind,
            timestamp: now,
            total_records: records.len(),
            overall_score,
            status: QualityStatus::from_score(overall_score),
            metrics: scores.iter().collect(),
            details,
            issues,
            recommendations,
            failure: None,
        };

        info!(
            collection = collection_id,
            kind = %kind,
            records = result.total_records,
            score = result.overall_score,
            status = %result.status,
            issues = result.issues.len(),
            "Collection scored"
        );
        result
    }

    /// Decodes a JSON document and scores it. Undecodable documents are degraded.
    pub fn score_json(
        &self,
        collection_id: &str,
        kind: DatasetKind,
        document: &serde_json::Value,
    ) -> ValidationResult {
        match RecordCollection::from_json(document, Some(kind.as_str())) {
            Ok(collection) => self.score(collection_id, kind, &collection),
            Err(e) => self.degraded(collection_id, kind, e.to_string()),
        }
    }

    pub fn degraded(
        &self,
        collection_id: &str,
        kind: DatasetKind,
        reason: impl Into<String>,
    ) -> ValidationResult {
        self.degraded_at(collection_id, kind, Utc::now(), reason)
    }

    fn degraded_at(
        &self,
        collection_id: &str,
        kind: DatasetKind,
        now: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> ValidationResult {
        let result = ValidationResult::degraded(collection_id, kind, now, reason);
        warn!(
            collection = collection_id,
            kind = %kind,
            reason = result.failure.as_deref().unwrap_or_default(),
            "Collection could not be scored"
        );
        result
    }
}

/// One remediation per dimension with an issue, in canonical order.
fn recommendations_for(issues: &[QualityIssue]) -> Vec<String> {
    if issues.is_empty() {
        return vec![ACCEPTABLE_QUALITY.to_string()];
    }

    let mut dimensions: Vec<Dimension> = issues
        .iter()
        .filter_map(|issue| issue.category.parse().ok())
        .collect();
    dimensions.dedup();

    dimensions
        .into_iter()
        .map(|dim| dim.remediation().to_string())
        .collect()
}
