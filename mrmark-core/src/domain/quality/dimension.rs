// mrmark-core/src/domain/quality/dimension.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// The six independent facets of data quality.
///
/// Declaration order is the canonical order used for metrics, issues and
/// recommendations (`Ord` follows it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Completeness,
    Accuracy,
    Consistency,
    Timeliness,
    Validity,
    Uniqueness,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::Completeness,
        Self::Accuracy,
        Self::Consistency,
        Self::Timeliness,
        Self::Validity,
        Self::Uniqueness,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Accuracy => "accuracy",
            Self::Consistency => "consistency",
            Self::Timeliness => "timeliness",
            Self::Validity => "validity",
            Self::Uniqueness => "uniqueness",
        }
    }

    /// Fixed remediation text for a dimension that fell below its threshold.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::Completeness => {
                "Improve completeness: backfill records with missing required fields and enforce required-field checks at collection time."
            }
            Self::Accuracy => {
                "Improve accuracy: strengthen format and value validation (identifier types, ISO-8601 timestamps, platform names) during transformation."
            }
            Self::Consistency => {
                "Improve consistency: standardise field types and value ranges (numeric counters must be numbers and never negative)."
            }
            Self::Timeliness => {
                "Improve timeliness: shorten the collection interval or move to real-time ingestion."
            }
            Self::Validity => {
                "Improve validity: reinforce domain validation (non-empty identifiers, well-formed URLs, value ranges)."
            }
            Self::Uniqueness => {
                "Improve uniqueness: add deduplication on the primary identifier to the cleansing step."
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownDimension(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), i);
        }
        assert!(Dimension::Completeness < Dimension::Uniqueness);
    }

    #[test]
    fn test_parsing() -> anyhow::Result<()> {
        assert_eq!(Dimension::from_str("Timeliness")?, Dimension::Timeliness);
        assert!(Dimension::from_str("freshness").is_err());
        Ok(())
    }

    #[test]
    fn test_serde_names() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Dimension::Uniqueness)?, "\"uniqueness\"");
        let parsed: Dimension = serde_yaml::from_str("validity")?;
        assert_eq!(parsed, Dimension::Validity);
        Ok(())
    }
}
