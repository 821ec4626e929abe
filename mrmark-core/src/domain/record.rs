// mrmark-core/src/domain/record.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// A single field value of a flat record.
///
/// JSON arrays and objects are kept as `Composite` so that type checks can
/// reject them instead of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Composite(serde_json::Value),
}

impl FieldValue {
    /// Present, non-null and not the empty string.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Key used to compare identifiers. `"1"` and `1` are distinct identifiers.
    pub fn identity_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(format!("b:{}", b)),
            Self::Integer(i) => Some(format!("i:{}", i)),
            Self::Float(f) => Some(format!("f:{}", f)),
            Self::Text(s) => Some(format!("s:{}", s)),
            Self::Composite(v) => Some(format!("c:{}", v)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A flat mapping of field name to scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    /// `None` when the key is absent; `Some(FieldValue::Null)` for an explicit null.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn is_filled(&self, field: &str) -> bool {
        self.get(field).is_some_and(FieldValue::is_filled)
    }
}

/// Keys under which collector output nests its record array.
const COLLECTION_KEYS: [&str; 3] = ["posts", "records", "data"];

/// An ordered batch of records awaiting validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Decodes a JSON document into a collection.
    ///
    /// Accepts a top-level array of objects, or an object holding such an array
    /// under `posts`, `records`, `data` or `extra_key` (usually the dataset kind).
    pub fn from_json(
        document: &serde_json::Value,
        extra_key: Option<&str>,
    ) -> Result<Self, DomainError> {
        let items = match document {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(map) => extra_key
                .into_iter()
                .chain(COLLECTION_KEYS)
                .find_map(|key| map.get(key))
                .ok_or_else(|| {
                    DomainError::MalformedCollection(
                        "object does not contain a record array".to_string(),
                    )
                })?
                .as_array()
                .ok_or_else(|| {
                    DomainError::MalformedCollection("record container is not an array".to_string())
                })?,
            other => {
                return Err(DomainError::MalformedCollection(format!(
                    "expected an array or an object, found {}",
                    json_type_name(other)
                )));
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(DomainError::MalformedCollection(format!(
                    "record #{} is {}, not an object",
                    idx,
                    json_type_name(item)
                )));
            }
            let record: Record = serde_json::from_value(item.clone())
                .map_err(|e| DomainError::MalformedCollection(format!("record #{}: {}", idx, e)))?;
            records.push(record);
        }

        Ok(Self { records })
    }
}

impl FromIterator<Record> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Parses an ISO-8601 timestamp. A trailing `Z` is accepted, and timestamps
/// without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
