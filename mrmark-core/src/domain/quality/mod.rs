pub mod catalog;
pub mod check;
pub mod dimension;
pub mod issue;
pub mod metric;
pub mod report;
pub mod rule;
pub mod scorer;
pub mod validator;

pub use catalog::{CompiledDatasetRules, DatasetRules, RuleCatalog};
pub use check::FieldCheck;
pub use dimension::Dimension;
pub use issue::{QualityIssue, Severity};
pub use metric::{MetricStatus, QualityMetric, QualityStatus};
pub use report::{ValidationResult, WarehouseReport};
pub use rule::{QualityConfig, QualityRule, QualityRuleSet};
pub use scorer::QualityScorer;
pub use validator::{DimensionScores, DimensionValidator, RuleBasedValidator};
