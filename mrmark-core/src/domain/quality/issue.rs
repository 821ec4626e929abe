// mrmark-core/src/domain/quality/issue.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::quality::dimension::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Tier for a score that is already below `threshold`.
    pub fn for_shortfall(score: f64, threshold: f64) -> Self {
        if score < threshold * 0.5 {
            Self::Critical
        } else if score < threshold * 0.8 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub category: String,
    pub description: String,
    pub affected_records: usize,
    pub recommendation: String,
}

impl QualityIssue {
    /// Issue for a dimension whose score fell below its threshold, or `None`.
    pub fn below_threshold(
        dimension: Dimension,
        score: f64,
        threshold: f64,
        affected_records: usize,
    ) -> Option<Self> {
        if score >= threshold {
            return None;
        }
        Some(Self {
            severity: Severity::for_shortfall(score, threshold),
            category: dimension.as_str().to_string(),
            description: format!(
                "{} score {:.3} is below the threshold {}",
                dimension, score, threshold
            ),
            affected_records,
            recommendation: dimension.remediation().to_string(),
        })
    }

    /// The same finding attributed to a warehouse table.
    pub fn scoped_to(&self, table: &str) -> Self {
        Self {
            category: format!("{}_{}", table, self.category),
            description: format!("[{}] {}", table, self.description),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_issue_at_or_above_threshold() {
        assert!(QualityIssue::below_threshold(Dimension::Accuracy, 0.9, 0.9, 10).is_none());
        assert!(QualityIssue::below_threshold(Dimension::Accuracy, 1.0, 0.9, 10).is_none());
    }

    #[test]
    fn test_severity_tiers() {
        let t = 0.9;
        let tier = |s| {
            QualityIssue::below_threshold(Dimension::Validity, s, t, 1)
                .unwrap()
                .severity
        };
        assert_eq!(tier(0.44), Severity::Critical);
        assert_eq!(tier(0.46), Severity::High);
        assert_eq!(tier(0.71), Severity::High);
        assert_eq!(tier(0.73), Severity::Medium);
        assert_eq!(tier(0.89), Severity::Medium);
    }

    #[test]
    fn test_issue_fields() {
        let issue = QualityIssue::below_threshold(Dimension::Uniqueness, 0.5, 0.98, 3).unwrap();
        assert_eq!(issue.category, "uniqueness");
        assert_eq!(issue.affected_records, 3);
        assert_eq!(issue.recommendation, Dimension::Uniqueness.remediation());
        assert!(issue.description.contains("0.500"));
    }

    #[test]
    fn test_scoped_to_table() {
        let issue = QualityIssue::below_threshold(Dimension::Completeness, 0.5, 0.95, 7).unwrap();
        let scoped = issue.scoped_to("posts");
        assert_eq!(scoped.category, "posts_completeness");
        assert!(scoped.description.starts_with("[posts] "));
        assert_eq!(scoped.severity, issue.severity);
        assert_eq!(scoped.affected_records, 7);
    }
}
