// mrmark-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection, params};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::domain::record::{FieldValue, Record, RecordCollection};
use crate::error::MrMarkError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

/// Read-only view of a DuckDB warehouse. A file database is opened without the
/// write lock, so loaders can keep writing while a report runs.
pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        // DuckDB refuses read-only in-memory databases.
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(Config::default())?
        } else {
            let config = Config::default().access_mode(AccessMode::ReadOnly)?;
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, MrMarkError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn table_exists(conn: &Connection, table_name: &str) -> Result<bool, duckdb::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_names(conn: &Connection, table_name: &str) -> Result<Vec<String>, duckdb::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_literal(table_name)))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    rows.collect()
}

/// Maps a DuckDB cell onto the record value model. Timestamps become RFC 3339
/// text so they go through the same parsing as JSON input.
fn to_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Boolean(b) => FieldValue::Bool(b),
        Value::TinyInt(v) => FieldValue::Integer(v.into()),
        Value::SmallInt(v) => FieldValue::Integer(v.into()),
        Value::Int(v) => FieldValue::Integer(v.into()),
        Value::BigInt(v) => FieldValue::Integer(v),
        Value::UTinyInt(v) => FieldValue::Integer(v.into()),
        Value::USmallInt(v) => FieldValue::Integer(v.into()),
        Value::UInt(v) => FieldValue::Integer(v.into()),
        Value::UBigInt(v) => i64::try_from(v)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Float(v as f64)),
        Value::HugeInt(v) => i64::try_from(v)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Float(v as f64)),
        Value::Float(v) => FieldValue::Float(v.into()),
        Value::Double(v) => FieldValue::Float(v),
        Value::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(FieldValue::Float)
            .unwrap_or_else(|_| FieldValue::Text(d.to_string())),
        Value::Text(s) | Value::Enum(s) => FieldValue::Text(s),
        Value::Timestamp(unit, v) => DateTime::from_timestamp_micros(unit.to_micros(v))
            .map(|ts| FieldValue::Text(ts.to_rfc3339()))
            .unwrap_or(FieldValue::Null),
        Value::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(|ts| FieldValue::Text(ts.date_naive().to_string()))
            .unwrap_or(FieldValue::Null),
        other => FieldValue::Text(format!("{:?}", other)),
    }
}

fn read_table(conn: &Connection, table_name: &str) -> Result<RecordCollection, MrMarkError> {
    let columns = column_names(conn, table_name)?;
    if columns.is_empty() {
        return Err(
            InfrastructureError::Database(DatabaseError::TableNotFound(table_name.to_string()))
                .into(),
        );
    }

    let select_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!("SELECT {} FROM {}", select_list, quote_ident(table_name));
    debug!(query = %query, "Reading table");

    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query([])?;
    let mut collection = RecordCollection::default();
    while let Some(row) = rows.next()? {
        let mut record = Record::new();
        for (idx, column) in columns.iter().enumerate() {
            let value: Value = row.get(idx)?;
            record.insert(column.clone(), to_field_value(value));
        }
        collection.push(record);
    }
    Ok(collection)
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn table_exists(&self, table_name: &str) -> Result<bool, MrMarkError> {
        let conn = self.lock()?;
        Ok(table_exists(&conn, table_name)?)
    }

    async fn fetch_records(&self, table_name: &str) -> Result<RecordCollection, MrMarkError> {
        let conn = self.lock()?;
        read_table(&conn, table_name)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}
