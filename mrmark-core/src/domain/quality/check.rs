// mrmark-core/src/domain/quality/check.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::record::{FieldValue, Record, parse_timestamp};

/// A declarative check on a single field.
///
/// Every check except `not_empty` passes when the key is absent: presence is
/// the business of completeness, not of format checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum FieldCheck {
    /// Present, non-null and not the empty string.
    NotEmpty { field: String },
    /// String or integer.
    Identifier { field: String },
    /// ISO-8601 string.
    Timestamp { field: String },
    OneOf { field: String, values: Vec<String> },
    Numeric { field: String },
    /// Numeric and >= 0.
    NonNegative { field: String },
    Range {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    MaxLength { field: String, max: usize },
    /// Only enforced when the value is a non-empty string or a non-string.
    UrlScheme { field: String, schemes: Vec<String> },
    Pattern { field: String, pattern: String },
}

impl FieldCheck {
    pub fn not_empty(field: &str) -> Self {
        Self::NotEmpty {
            field: field.to_string(),
        }
    }

    pub fn identifier(field: &str) -> Self {
        Self::Identifier {
            field: field.to_string(),
        }
    }

    pub fn timestamp(field: &str) -> Self {
        Self::Timestamp {
            field: field.to_string(),
        }
    }

    pub fn one_of(field: &str, values: &[&str]) -> Self {
        Self::OneOf {
            field: field.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn non_negative(field: &str) -> Self {
        Self::NonNegative {
            field: field.to_string(),
        }
    }

    pub fn range(field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            field: field.to_string(),
            min,
            max,
        }
    }

    pub fn max_length(field: &str, max: usize) -> Self {
        Self::MaxLength {
            field: field.to_string(),
            max,
        }
    }

    pub fn url_scheme(field: &str, schemes: &[&str]) -> Self {
        Self::UrlScheme {
            field: field.to_string(),
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::NotEmpty { field }
            | Self::Identifier { field }
            | Self::Timestamp { field }
            | Self::OneOf { field, .. }
            | Self::Numeric { field }
            | Self::NonNegative { field }
            | Self::Range { field, .. }
            | Self::MaxLength { field, .. }
            | Self::UrlScheme { field, .. }
            | Self::Pattern { field, .. } => field,
        }
    }

    pub fn try_compile(&self) -> Result<CompiledCheck, regex::Error> {
        let regex = match self {
            Self::Pattern { pattern, .. } => Some(Regex::new(pattern)?),
            _ => None,
        };
        Ok(CompiledCheck {
            check: self.clone(),
            regex,
        })
    }
}

impl fmt::Display for FieldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEmpty { field } => write!(f, "{} is not empty", field),
            Self::Identifier { field } => write!(f, "{} is a string or integer", field),
            Self::Timestamp { field } => write!(f, "{} is an ISO-8601 timestamp", field),
            Self::OneOf { field, values } => write!(f, "{} in [{}]", field, values.join(", ")),
            Self::Numeric { field } => write!(f, "{} is numeric", field),
            Self::NonNegative { field } => write!(f, "{} >= 0", field),
            Self::Range { field, min, max } => match (min, max) {
                (Some(lo), Some(hi)) => write!(f, "{} <= {} <= {}", lo, field, hi),
                (Some(lo), None) => write!(f, "{} >= {}", field, lo),
                (None, Some(hi)) => write!(f, "{} <= {}", field, hi),
                (None, None) => write!(f, "{} is numeric", field),
            },
            Self::MaxLength { field, max } => write!(f, "length({}) <= {}", field, max),
            Self::UrlScheme { field, schemes } => {
                write!(f, "{} starts with {}", field, schemes.join(" | "))
            }
            Self::Pattern { field, pattern } => write!(f, "{} matches /{}/", field, pattern),
        }
    }
}

/// A `FieldCheck` ready to run (regex compiled once at configuration time).
#[derive(Debug, Clone)]
pub struct CompiledCheck {
    check: FieldCheck,
    regex: Option<Regex>,
}

impl CompiledCheck {
    pub fn check(&self) -> &FieldCheck {
        &self.check
    }

    pub fn passes(&self, record: &Record) -> bool {
        let value = match (&self.check, record.get(self.check.field())) {
            (FieldCheck::NotEmpty { .. }, value) => {
                return value.is_some_and(FieldValue::is_filled);
            }
            (_, None) => return true,
            (_, Some(value)) => value,
        };

        match &self.check {
            FieldCheck::NotEmpty { .. } => value.is_filled(),
            FieldCheck::Identifier { .. } => {
                matches!(value, FieldValue::Text(_) | FieldValue::Integer(_))
            }
            FieldCheck::Timestamp { .. } => value.as_str().and_then(parse_timestamp).is_some(),
            FieldCheck::OneOf { values, .. } => value
                .as_str()
                .is_some_and(|s| values.iter().any(|allowed| allowed == s)),
            FieldCheck::Numeric { .. } => value.as_f64().is_some(),
            FieldCheck::NonNegative { .. } => value.as_f64().is_some_and(|n| n >= 0.0),
            FieldCheck::Range { min, max, .. } => value.as_f64().is_some_and(|n| {
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }),
            FieldCheck::MaxLength { max, .. } => value
                .as_str()
                .is_some_and(|s| s.chars().count() <= *max),
            FieldCheck::UrlScheme { schemes, .. } => match value {
                FieldValue::Null => true,
                FieldValue::Text(s) if s.is_empty() => true,
                FieldValue::Text(s) => schemes.iter().any(|scheme| s.starts_with(scheme.as_str())),
                _ => false,
            },
            FieldCheck::Pattern { .. } => match (&self.regex, value.as_str()) {
                (Some(regex), Some(s)) => regex.is_match(s),
                _ => false,
            },
        }
    }
}
