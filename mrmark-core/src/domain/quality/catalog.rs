// mrmark-core/src/domain/quality/catalog.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::dataset::DatasetKind;
use crate::domain::error::DomainError;
use crate::domain::quality::check::{CompiledCheck, FieldCheck};
use crate::domain::quality::dimension::Dimension;
use crate::domain::quality::validator::RuleBasedValidator;

const PLATFORMS: [&str; 5] = ["instagram", "facebook", "twitter", "linkedin", "tiktok"];
const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Declarative rules for one dataset kind.
///
/// `checks` is keyed by dimension. Completeness takes `not_empty` checks as
/// its required-field set; timeliness and uniqueness are driven by
/// `timestamp_field` and `id_field` and accept no checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_field: Option<String>,

    #[serde(default)]
    pub checks: BTreeMap<Dimension, Vec<FieldCheck>>,
}

impl DatasetRules {
    fn new(id_field: &str, timestamp_field: &str) -> Self {
        Self {
            id_field: Some(id_field.to_string()),
            timestamp_field: Some(timestamp_field.to_string()),
            checks: BTreeMap::new(),
        }
    }

    fn required(mut self, fields: &[&str]) -> Self {
        self.checks.insert(
            Dimension::Completeness,
            fields.iter().map(|f| FieldCheck::not_empty(f)).collect(),
        );
        self
    }

    fn with_checks(mut self, dimension: Dimension, checks: Vec<FieldCheck>) -> Self {
        self.checks.insert(dimension, checks);
        self
    }

    /// Built-in rules for each known dataset kind.
    pub fn builtin(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::SnsPosts => Self::new("id", "timestamp")
                .required(&["id", "timestamp", "platform"])
                .with_checks(
                    Dimension::Accuracy,
                    vec![
                        FieldCheck::identifier("id"),
                        FieldCheck::timestamp("timestamp"),
                        FieldCheck::one_of("platform", &PLATFORMS),
                    ],
                )
                .with_checks(
                    Dimension::Consistency,
                    vec![
                        FieldCheck::non_negative("like_count"),
                        FieldCheck::non_negative("comment_count"),
                    ],
                )
                .with_checks(
                    Dimension::Validity,
                    vec![
                        FieldCheck::not_empty("id"),
                        FieldCheck::url_scheme("media_url", &URL_SCHEMES),
                    ],
                ),
            DatasetKind::Posts => Self::new("id", "created_at")
                .required(&[
                    "id",
                    "platform",
                    "content",
                    "media_type",
                    "created_at",
                    "likes",
                    "comments",
                    "shares",
                    "hashtags",
                    "user_id",
                    "engagement_rate",
                ])
                .with_checks(
                    Dimension::Accuracy,
                    vec![
                        FieldCheck::not_empty("id"),
                        FieldCheck::one_of("platform", &PLATFORMS),
                        FieldCheck::not_empty("created_at"),
                    ],
                )
                .with_checks(
                    Dimension::Consistency,
                    vec![
                        FieldCheck::non_negative("likes"),
                        FieldCheck::non_negative("comments"),
                        FieldCheck::non_negative("shares"),
                        FieldCheck::range("engagement_rate", None, Some(1.0)),
                    ],
                )
                .with_checks(
                    Dimension::Validity,
                    vec![
                        FieldCheck::not_empty("id"),
                        FieldCheck::max_length("content", 10_000),
                        FieldCheck::range("likes", Some(0.0), Some(1_000_000.0)),
                        FieldCheck::range("comments", Some(0.0), Some(100_000.0)),
                    ],
                ),
            DatasetKind::Users => Self::new("id", "last_active")
                .required(&[
                    "id",
                    "platform",
                    "username",
                    "followers",
                    "following",
                    "posts_count",
                    "engagement_rate",
                    "last_active",
                ])
                .with_checks(
                    Dimension::Accuracy,
                    vec![
                        FieldCheck::not_empty("id"),
                        FieldCheck::one_of("platform", &PLATFORMS),
                        FieldCheck::non_negative("followers"),
                    ],
                )
                .with_checks(
                    Dimension::Consistency,
                    vec![
                        FieldCheck::non_negative("followers"),
                        FieldCheck::non_negative("following"),
                    ],
                )
                .with_checks(
                    Dimension::Validity,
                    vec![
                        FieldCheck::not_empty("id"),
                        FieldCheck::range("followers", Some(0.0), Some(10_000_000.0)),
                        FieldCheck::range("following", Some(0.0), Some(10_000.0)),
                    ],
                ),
            DatasetKind::Hashtags => Self::new("hashtag", "created_at")
                .required(&[
                    "hashtag",
                    "platform",
                    "post_count",
                    "engagement_count",
                    "trend_score",
                    "created_at",
                ])
                .with_checks(
                    Dimension::Accuracy,
                    vec![
                        FieldCheck::not_empty("hashtag"),
                        FieldCheck::non_negative("post_count"),
                    ],
                )
                .with_checks(Dimension::Validity, vec![FieldCheck::not_empty("hashtag")]),
            DatasetKind::Engagement => Self::new("id", "timestamp")
                .required(&["id", "post_id", "user_id", "engagement_type", "timestamp"])
                .with_checks(Dimension::Validity, vec![FieldCheck::not_empty("id")]),
            DatasetKind::Trends => Self::new("id", "timestamp")
                .required(&[
                    "id",
                    "keyword",
                    "platform",
                    "trend_score",
                    "volume",
                    "growth_rate",
                    "timestamp",
                ])
                .with_checks(
                    Dimension::Consistency,
                    vec![FieldCheck::non_negative("volume")],
                )
                .with_checks(Dimension::Validity, vec![FieldCheck::not_empty("id")]),
        }
    }
}

/// `DatasetRules` with every check compiled.
#[derive(Debug, Clone)]
pub struct CompiledDatasetRules {
    definition: DatasetRules,
    checks: BTreeMap<Dimension, Vec<CompiledCheck>>,
}

impl CompiledDatasetRules {
    pub fn compile(kind: DatasetKind, definition: DatasetRules) -> Result<Self, DomainError> {
        let mut checks = BTreeMap::new();
        for (dimension, field_checks) in &definition.checks {
            if matches!(dimension, Dimension::Timeliness | Dimension::Uniqueness)
                && !field_checks.is_empty()
            {
                return Err(DomainError::InvalidRule {
                    kind: kind.to_string(),
                    reason: format!(
                        "{} takes no field checks; configure timestamp_field / id_field instead",
                        dimension
                    ),
                });
            }
            if *dimension == Dimension::Completeness
                && field_checks
                    .iter()
                    .any(|c| !matches!(c, FieldCheck::NotEmpty { .. }))
            {
                return Err(DomainError::InvalidRule {
                    kind: kind.to_string(),
                    reason: "completeness only accepts not_empty checks".to_string(),
                });
            }

            let compiled = field_checks
                .iter()
                .map(|c| {
                    c.try_compile().map_err(|e| DomainError::InvalidRule {
                        kind: kind.to_string(),
                        reason: format!("invalid pattern on '{}': {}", c.field(), e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            checks.insert(*dimension, compiled);
        }

        Ok(Self { definition, checks })
    }

    pub fn id_field(&self) -> Option<&str> {
        self.definition.id_field.as_deref()
    }

    pub fn timestamp_field(&self) -> Option<&str> {
        self.definition.timestamp_field.as_deref()
    }

    pub fn checks_for(&self, dimension: Dimension) -> &[CompiledCheck] {
        self.checks.get(&dimension).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Rule table keyed by `(dataset_kind, dimension)`.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    datasets: BTreeMap<DatasetKind, CompiledDatasetRules>,
}

impl RuleCatalog {
    /// Built-in rules, with `overrides` replacing whole dataset entries.
    pub fn compile(overrides: &BTreeMap<DatasetKind, DatasetRules>) -> Result<Self, DomainError> {
        let mut datasets = BTreeMap::new();
        for kind in DatasetKind::ALL {
            let definition = overrides
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| DatasetRules::builtin(kind));
            datasets.insert(kind, CompiledDatasetRules::compile(kind, definition)?);
        }
        Ok(Self { datasets })
    }

    pub fn rules(&self, kind: DatasetKind) -> Option<&CompiledDatasetRules> {
        self.datasets.get(&kind)
    }

    pub fn validator(
        &self,
        kind: DatasetKind,
        freshness_window: chrono::Duration,
    ) -> Option<RuleBasedValidator<'_>> {
        self.rules(kind)
            .map(|rules| RuleBasedValidator::new(rules, freshness_window))
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        let datasets = DatasetKind::ALL
            .into_iter()
            .filter_map(|kind| {
                CompiledDatasetRules::compile(kind, DatasetRules::builtin(kind))
                    .ok()
                    .map(|rules| (kind, rules))
            })
            .collect();
        Self { datasets }
    }
}
