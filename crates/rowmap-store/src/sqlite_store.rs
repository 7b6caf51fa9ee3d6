//! `RowStore` over a single rusqlite connection

use std::path::Path;
use std::sync::Arc;

use rowmap_core::store::{Parameter, QueryOutcome, RowStore};
use rowmap_core::{Row, StoreConfig, Value};
use rusqlite::types::{ToSql, Value as SqlValue, ValueRef};
use rusqlite::Connection;

use crate::db;
use crate::errors::{from_rusqlite, statement_error, Result};

/// SQLite-backed row store
///
/// Owns one connection for its whole lifetime. Calls block; callers
/// serialize access.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap an already configured connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) a database file with default pragmas
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = StoreConfig {
            path: Some(path.as_ref().to_path_buf()),
            ..StoreConfig::default()
        };
        Self::from_config(&config)
    }

    /// Open a private in-memory database with default pragmas
    pub fn open_in_memory() -> Result<Self> {
        Self::from_config(&StoreConfig::default())
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let conn = db::open_with(config)?;
        tracing::debug!(path = ?config.path, wal = config.wal, "opened sqlite store");
        Ok(Self::new(conn))
    }

    /// Underlying connection, for setup statements outside the row-store surface
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| from_rusqlite(err))
    }
}

fn to_core_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

impl RowStore for SqliteStore {
    fn execute(&self, sql: &str) -> Result<QueryOutcome> {
        tracing::debug!(sql = %sql, "sqlite query");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| statement_error("execute", sql, e))?;

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        let width = columns.len();

        let mut rows = stmt
            .query([])
            .map_err(|e| statement_error("execute", sql, e))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(|e| statement_error("execute", sql, e))? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                let value = row.get_ref(idx).map_err(from_rusqlite)?;
                values.push(to_core_value(value));
            }
            collected.push(Row::new(Arc::clone(&columns), values));
        }

        Ok(QueryOutcome::from_rows(collected))
    }

    fn execute_non_query(&self, sql: &str, params: &[Parameter]) -> Result<usize> {
        tracing::debug!(sql = %sql, params = params.len(), "sqlite statement");
        let names: Vec<String> = params.iter().map(Parameter::name).collect();
        let values: Vec<SqlValue> = params.iter().map(|p| to_sql_value(&p.value)).collect();
        let bound: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| statement_error("execute_non_query", sql, e))?;
        stmt.execute(bound.as_slice())
            .map_err(|e| statement_error("execute_non_query", sql, e))
    }

    fn last_inserted_id(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT last_insert_rowid()", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}
