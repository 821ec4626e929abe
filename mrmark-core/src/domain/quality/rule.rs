// mrmark-core/src/domain/quality/rule.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::domain::dataset::DatasetKind;
use crate::domain::error::DomainError;
use crate::domain::quality::catalog::DatasetRules;
use crate::domain::quality::dimension::Dimension;

pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 300;

/// Quality settings as they appear in `mrmark.yaml` / `quality.yml`.
///
/// Every field is optional: missing rules and datasets fall back to the
/// built-in defaults when the scorer is constructed.
#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct QualityConfig {
    #[serde(default = "default_freshness_window")]
    #[validate(range(min = 1))]
    pub freshness_window_secs: u64,

    #[serde(default)]
    #[validate(nested)]
    pub rules: Vec<QualityRule>,

    #[serde(default)]
    pub datasets: BTreeMap<DatasetKind, DatasetRules>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            rules: Vec::new(),
            datasets: BTreeMap::new(),
        }
    }
}

fn default_freshness_window() -> u64 {
    DEFAULT_FRESHNESS_WINDOW_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct QualityRule {
    pub name: Dimension,

    #[validate(custom(function = "finite"), range(min = 0.0, max = 1.0))]
    pub threshold: f64,

    #[serde(default = "default_weight")]
    #[validate(custom(function = "finite"), range(min = 0.0))]
    pub weight: f64,

    #[serde(default)]
    pub description: String,
}

fn default_weight() -> f64 {
    1.0
}

// `range` lets NaN and infinities through.
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

impl QualityRule {
    pub fn new(name: Dimension, threshold: f64, description: &str) -> Self {
        Self {
            name,
            threshold,
            weight: default_weight(),
            description: description.to_string(),
        }
    }
}

/// One rule per dimension, always complete.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QualityRuleSet {
    rules: [QualityRule; 6],
}

impl Default for QualityRuleSet {
    fn default() -> Self {
        Self {
            rules: [
                QualityRule::new(
                    Dimension::Completeness,
                    0.95,
                    "at least 95% of required fields populated",
                ),
                QualityRule::new(
                    Dimension::Accuracy,
                    0.90,
                    "at least 90% of records pass format checks",
                ),
                QualityRule::new(
                    Dimension::Consistency,
                    0.85,
                    "at least 85% of records pass type and range checks",
                ),
                QualityRule::new(
                    Dimension::Timeliness,
                    0.80,
                    "at least 80% of timestamped records inside the freshness window",
                ),
                QualityRule::new(
                    Dimension::Validity,
                    0.95,
                    "at least 95% of records pass domain validity checks",
                ),
                QualityRule::new(
                    Dimension::Uniqueness,
                    0.98,
                    "at least 98% of identifiers distinct",
                ),
            ],
        }
    }
}

impl QualityRuleSet {
    /// Defaults with the given rules replacing their dimension's entry.
    pub fn with_overrides(overrides: &[QualityRule]) -> Result<Self, DomainError> {
        let mut set = Self::default();
        for rule in overrides {
            rule.validate().map_err(|e| {
                DomainError::InvalidConfig(format!("rule '{}': {}", rule.name, e))
            })?;
            set.rules[rule.name.index()] = rule.clone();
        }
        Ok(set)
    }

    pub fn rule(&self, dimension: Dimension) -> &QualityRule {
        &self.rules[dimension.index()]
    }

    pub fn threshold(&self, dimension: Dimension) -> f64 {
        self.rule(dimension).threshold
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityRule> {
        self.rules.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::validator::DimensionScores;

    #[test]
    fn test_default_thresholds() {
        let set = QualityRuleSet::default();
        assert_eq!(set.threshold(Dimension::Completeness), 0.95);
        assert_eq!(set.threshold(Dimension::Accuracy), 0.90);
        assert_eq!(set.threshold(Dimension::Consistency), 0.85);
        assert_eq!(set.threshold(Dimension::Timeliness), 0.80);
        assert_eq!(set.threshold(Dimension::Validity), 0.95);
        assert_eq!(set.threshold(Dimension::Uniqueness), 0.98);
        assert!(set.iter().all(|r| r.weight == 1.0));
        for dim in Dimension::ALL {
            assert_eq!(set.rule(dim).name, dim);
        }
    }

    #[test]
    fn test_overrides_replace_single_dimension() {
        let set = QualityRuleSet::with_overrides(&[QualityRule {
            name: Dimension::Uniqueness,
            threshold: 0.5,
            weight: 2.0,
            description: "relaxed".into(),
        }])
        .unwrap();

        assert_eq!(set.threshold(Dimension::Uniqueness), 0.5);
        assert_eq!(set.rule(Dimension::Uniqueness).weight, 2.0);
        assert_eq!(set.threshold(Dimension::Completeness), 0.95);
    }

    #[test]
    fn test_overrides_reject_out_of_range_values() {
        let too_high = QualityRule::new(Dimension::Accuracy, 1.5, "");
        assert!(matches!(
            QualityRuleSet::with_overrides(&[too_high]),
            Err(DomainError::InvalidConfig(_))
        ));

        let mut negative_weight = QualityRule::new(Dimension::Accuracy, 0.9, "");
        negative_weight.weight = -1.0;
        assert!(QualityRuleSet::with_overrides(&[negative_weight]).is_err());
    }

    #[test]
    fn test_config_yaml_defaults() {
        let yaml = r#"
rules:
  - name: timeliness
    threshold: 0.5
"#;
        let config: QualityConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.freshness_window_secs, 300);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].weight, 1.0);
        assert!(config.datasets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        for yaml in [
            "name: timeliness\nthreshold: .nan\n",
            "name: timeliness\nthreshold: .inf\n",
            "name: timeliness\nthreshold: 0.8\nweight: .inf\n",
            "name: timeliness\nthreshold: 0.8\nweight: .nan\n",
        ] {
            let rule: QualityRule = serde_yaml::from_str(yaml).unwrap();
            assert!(rule.validate().is_err(), "accepted {:?}", rule);
            assert!(matches!(
                QualityRuleSet::with_overrides(&[rule]),
                Err(DomainError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_overall_ignores_unvalidated_infinite_weight() {
        // Built in place: `with_overrides` would reject this rule.
        let mut set = QualityRuleSet::default();
        set.rules[Dimension::Timeliness.index()].weight = f64::INFINITY;

        let scores = DimensionScores {
            completeness: 1.0,
            ..DimensionScores::default()
        };
        assert_eq!(scores.overall(&set), 0.0);
    }

    #[test]
    fn test_config_rejects_zero_window() {
        let config = QualityConfig {
            freshness_window_secs: 0,
            ..QualityConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
