// mrmark-core/src/domain/quality/metric.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::quality::dimension::Dimension;

/// Per-dimension status relative to the dimension's own threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Good,
    Warning,
    Critical,
}

impl MetricStatus {
    pub fn classify(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            Self::Good
        } else if value >= threshold * 0.8 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetric {
    pub name: Dimension,
    pub value: f64,
    pub threshold: f64,
    pub status: MetricStatus,
}

impl QualityMetric {
    pub fn new(name: Dimension, value: f64, threshold: f64) -> Self {
        Self {
            name,
            value,
            threshold,
            status: MetricStatus::classify(value, threshold),
        }
    }
}

/// Status of an overall (collection or table) score. The cut-offs are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    Critical,
    Warning,
    Good,
    Excellent,
}

impl QualityStatus {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.9 => Self::Excellent,
            s if s >= 0.8 => Self::Good,
            s if s >= 0.7 => Self::Warning,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
