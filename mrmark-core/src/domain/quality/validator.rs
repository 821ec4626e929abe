// mrmark-core/src/domain/quality/validator.rs

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::quality::catalog::CompiledDatasetRules;
use crate::domain::quality::check::CompiledCheck;
use crate::domain::quality::dimension::Dimension;
use crate::domain::quality::rule::QualityRuleSet;
use crate::domain::record::{Record, parse_timestamp};

/// The six dimension scores of one evaluation, each a ratio in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DimensionScores {
    pub completeness: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub timeliness: f64,
    pub validity: f64,
    pub uniqueness: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Completeness => self.completeness,
            Dimension::Accuracy => self.accuracy,
            Dimension::Consistency => self.consistency,
            Dimension::Timeliness => self.timeliness,
            Dimension::Validity => self.validity,
            Dimension::Uniqueness => self.uniqueness,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Weighted mean using each rule's weight. Equal weights give the plain mean;
    /// a zero total weight or a non-finite sum gives 0.0.
    pub fn overall(&self, rules: &QualityRuleSet) -> f64 {
        let (weighted, total_weight) = self
            .iter()
            .map(|(dim, score)| (score, rules.rule(dim).weight))
            .fold((0.0, 0.0), |(acc, w_acc), (score, w)| {
                (acc + score * w, w_acc + w)
            });

        let overall = weighted / total_weight;
        if total_weight <= 0.0 || !overall.is_finite() {
            return 0.0;
        }
        overall
    }
}

/// Capability set every dataset validator provides.
///
/// Each dimension is computed in isolation; `evaluate` is the only place the
/// six are brought together.
pub trait DimensionValidator {
    fn completeness(&self, records: &[Record]) -> f64;
    fn accuracy(&self, records: &[Record]) -> f64;
    fn consistency(&self, records: &[Record]) -> f64;
    fn timeliness(&self, records: &[Record], now: DateTime<Utc>) -> f64;
    fn validity(&self, records: &[Record]) -> f64;
    fn uniqueness(&self, records: &[Record]) -> f64;

    fn evaluate(&self, records: &[Record], now: DateTime<Utc>) -> DimensionScores {
        DimensionScores {
            completeness: self.completeness(records),
            accuracy: self.accuracy(records),
            consistency: self.consistency(records),
            timeliness: self.timeliness(records, now),
            validity: self.validity(records),
            uniqueness: self.uniqueness(records),
        }
    }
}

/// Validator driven by a dataset's declarative rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedValidator<'a> {
    rules: &'a CompiledDatasetRules,
    freshness_window: Duration,
}

impl<'a> RuleBasedValidator<'a> {
    pub fn new(rules: &'a CompiledDatasetRules, freshness_window: Duration) -> Self {
        Self {
            rules,
            freshness_window,
        }
    }

    /// Fraction of records passing every check of `dimension` (AND semantics).
    fn passing_ratio(&self, records: &[Record], dimension: Dimension) -> f64 {
        let checks = self.rules.checks_for(dimension);
        ratio(
            records
                .iter()
                .filter(|record| all_pass(checks, record))
                .count(),
            records.len(),
        )
    }
}

fn all_pass(checks: &[CompiledCheck], record: &Record) -> bool {
    checks.iter().all(|check| check.passes(record))
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

impl DimensionValidator for RuleBasedValidator<'_> {
    fn completeness(&self, records: &[Record]) -> f64 {
        if records.is_empty() {
            return 0.0;
        }
        let required = self.rules.checks_for(Dimension::Completeness);
        if required.is_empty() {
            return 1.0;
        }

        let filled = records
            .iter()
            .map(|record| required.iter().filter(|c| c.passes(record)).count())
            .sum();
        ratio(filled, records.len() * required.len())
    }

    fn accuracy(&self, records: &[Record]) -> f64 {
        self.passing_ratio(records, Dimension::Accuracy)
    }

    fn consistency(&self, records: &[Record]) -> f64 {
        self.passing_ratio(records, Dimension::Consistency)
    }

    fn timeliness(&self, records: &[Record], now: DateTime<Utc>) -> f64 {
        let Some(field) = self.rules.timestamp_field() else {
            return 0.0;
        };

        // Missing or unparsable timestamps are left out of both sides.
        let (timely, timestamped) = records
            .iter()
            .filter_map(|record| record.get(field)?.as_str().and_then(parse_timestamp))
            .fold((0_usize, 0_usize), |(timely, total), ts| {
                let age_ms = (now - ts).num_milliseconds().abs();
                let fresh = age_ms <= self.freshness_window.num_milliseconds();
                (timely + usize::from(fresh), total + 1)
            });

        ratio(timely, timestamped)
    }

    fn validity(&self, records: &[Record]) -> f64 {
        self.passing_ratio(records, Dimension::Validity)
    }

    fn uniqueness(&self, records: &[Record]) -> f64 {
        let Some(field) = self.rules.id_field() else {
            return 0.0;
        };

        let ids: Vec<String> = records
            .iter()
            .filter_map(|record| record.get(field)?.identity_key())
            .collect();
        let distinct: HashSet<&String> = ids.iter().collect();

        ratio(distinct.len(), ids.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::DatasetKind;
    use crate::domain::quality::catalog::DatasetRules;
    use crate::domain::quality::rule::QualityRule;
    use crate::domain::record::FieldValue;

    fn sns_rules() -> CompiledDatasetRules {
        CompiledDatasetRules::compile(
            DatasetKind::SnsPosts,
            DatasetRules::builtin(DatasetKind::SnsPosts),
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-03-01T12:00:00Z").unwrap()
    }

    fn post(id: &str, ts: &str) -> Record {
        Record::new()
            .with("id", id)
            .with("timestamp", ts)
            .with("platform", "instagram")
            .with("like_count", 10_i64)
            .with("comment_count", 2_i64)
    }

    #[test]
    fn test_accuracy_uses_and_semantics() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![
            post("a", "2025-03-01T12:00:00Z"),
            // Valid id and timestamp, unknown platform: fully inaccurate.
            post("b", "2025-03-01T12:00:00Z").with("platform", "myspace"),
        ];
        assert_eq!(validator.accuracy(&records), 0.5);
    }

    #[test]
    fn test_consistency_rejects_negative_and_non_numeric_counts() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![
            post("a", "2025-03-01T12:00:00Z"),
            post("b", "2025-03-01T12:00:00Z").with("like_count", -3_i64),
            post("c", "2025-03-01T12:00:00Z").with("comment_count", "many"),
            post("d", "2025-03-01T12:00:00Z"),
        ];
        assert_eq!(validator.consistency(&records), 0.5);
    }

    #[test]
    fn test_timeliness_excludes_unparsable_timestamps() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![
            post("fresh", "2025-03-01T11:58:00Z"),
            post("future", "2025-03-01T12:04:00Z"),
            post("stale", "2025-03-01T11:00:00Z"),
            post("garbage", "not a date"),
            Record::new().with("id", "no-ts"),
        ];
        // 2 timely out of 3 parsable timestamps.
        let score = validator.timeliness(&records, now());
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_freshness_window_is_inclusive() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));

        let at_edge = vec![
            post("past", "2025-03-01T11:55:00Z"),
            post("future", "2025-03-01T12:05:00Z"),
        ];
        assert_eq!(validator.timeliness(&at_edge, now()), 1.0);

        let past_edge = vec![
            post("past", "2025-03-01T11:54:59Z"),
            post("future", "2025-03-01T12:05:01Z"),
        ];
        assert_eq!(validator.timeliness(&past_edge, now()), 0.0);
    }

    #[test]
    fn test_timeliness_without_parsable_timestamps_is_zero() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![post("a", "garbage")];
        assert_eq!(validator.timeliness(&records, now()), 0.0);
    }

    #[test]
    fn test_validity_checks_media_url_scheme() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![
            post("a", "2025-03-01T12:00:00Z").with("media_url", "https://img.example/a.png"),
            post("b", "2025-03-01T12:00:00Z").with("media_url", "file:///tmp/a.png"),
            post("", "2025-03-01T12:00:00Z"),
            post("d", "2025-03-01T12:00:00Z"),
        ];
        assert_eq!(validator.validity(&records), 0.5);
    }

    #[test]
    fn test_uniqueness_ignores_records_without_identifier() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![
            post("a", "2025-03-01T12:00:00Z"),
            post("b", "2025-03-01T12:00:00Z"),
            Record::new().with("id", FieldValue::Null),
            Record::new().with("platform", "tiktok"),
        ];
        assert_eq!(validator.uniqueness(&records), 1.0);

        let unidentified = vec![Record::new().with("platform", "tiktok")];
        assert_eq!(validator.uniqueness(&unidentified), 0.0);
    }

    #[test]
    fn test_uniqueness_is_non_increasing_with_duplicates() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let mut records = vec![
            post("a", "2025-03-01T12:00:00Z"),
            post("b", "2025-03-01T12:00:00Z"),
            post("c", "2025-03-01T12:00:00Z"),
        ];
        let mut previous = validator.uniqueness(&records);
        assert_eq!(previous, 1.0);

        for _ in 0..5 {
            records.push(post("a", "2025-03-01T12:00:00Z"));
            let current = validator.uniqueness(&records);
            assert!(current <= previous);
            assert!(current < 1.0);
            previous = current;
        }
    }

    #[test]
    fn test_string_and_integer_ids_are_distinct() {
        let rules = sns_rules();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![Record::new().with("id", "1"), Record::new().with("id", 1_i64)];
        assert_eq!(validator.uniqueness(&records), 1.0);
    }

    #[test]
    fn test_no_checks_passes_non_empty_collections() {
        let rules = CompiledDatasetRules::compile(
            DatasetKind::Engagement,
            DatasetRules::builtin(DatasetKind::Engagement),
        )
        .unwrap();
        let validator = RuleBasedValidator::new(&rules, Duration::seconds(300));
        let records = vec![Record::new().with("id", 1_i64)];
        assert_eq!(validator.accuracy(&records), 1.0);
        assert_eq!(validator.consistency(&records), 1.0);
        assert_eq!(validator.accuracy(&[]), 0.0);
    }

    #[test]
    fn test_weighted_overall() {
        let scores = DimensionScores {
            completeness: 1.0,
            accuracy: 0.8,
            consistency: 0.6,
            timeliness: 0.4,
            validity: 1.0,
            uniqueness: 0.9,
        };
        let unweighted = scores.overall(&QualityRuleSet::default());
        assert!((unweighted - 0.783_333).abs() < 1e-4);

        let mut heavy_timeliness = QualityRule::new(Dimension::Timeliness, 0.8, "");
        heavy_timeliness.weight = 4.0;
        let rules = QualityRuleSet::with_overrides(&[heavy_timeliness]).unwrap();
        // (1.0 + 0.8 + 0.6 + 4 * 0.4 + 1.0 + 0.9) / 9
        assert!((scores.overall(&rules) - 5.9 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_weight_gives_zero() {
        let zeroed: Vec<QualityRule> = Dimension::ALL
            .into_iter()
            .map(|d| {
                let mut rule = QualityRule::new(d, 0.5, "");
                rule.weight = 0.0;
                rule
            })
            .collect();
        let rules = QualityRuleSet::with_overrides(&zeroed).unwrap();
        let scores = DimensionScores {
            completeness: 1.0,
            ..DimensionScores::default()
        };
        assert_eq!(scores.overall(&rules), 0.0);
    }
}
