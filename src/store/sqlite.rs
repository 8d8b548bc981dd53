//! SQLite-backed store
//!
//! A single connection behind a mutex. Foreign keys are enabled on open so
//! the owner reference on every content relation is enforced.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::Connection;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::{ColumnInfo, ExecOutcome, Row, Store};
use crate::sql::{generate_identity_create, quote_ident, SqlValue, Statement, IDENTITY_RELATION};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates the identity relation if it does not exist yet.
    pub fn bootstrap(&self) -> StoreResult<()> {
        self.execute(&generate_identity_create())?;
        debug!(relation = IDENTITY_RELATION, "identity relation ready");
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::other("connection mutex poisoned"))
    }
}

impl Store for SqliteStore {
    fn execute(&self, statement: &Statement) -> StoreResult<ExecOutcome> {
        let conn = self.lock()?;
        let mut prepared = conn.prepare(&statement.sql)?;
        let params = rusqlite::params_from_iter(statement.params.iter().map(to_sqlite));

        if prepared.column_count() == 0 {
            let count = prepared.execute(params)?;
            return Ok(ExecOutcome::Affected {
                count: count as u64,
                last_insert_id: conn.last_insert_rowid(),
            });
        }

        let names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut rows = prepared.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (idx, name) in names.iter().enumerate() {
                record.insert(name.clone(), from_sqlite(row.get_ref(idx)?).into_json());
            }
            out.push(record);
        }
        Ok(ExecOutcome::Rows(out))
    }

    fn describe_columns(&self, relation: &str) -> StoreResult<Vec<ColumnInfo>> {
        let conn = self.lock()?;
        let mut prepared = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(relation)))?;
        let columns = prepared
            .query_map([], |row| {
                let notnull: i64 = row.get("notnull")?;
                Ok(ColumnInfo {
                    name: row.get("name")?,
                    type_name: row.get("type")?,
                    nullable: notnull == 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(StoreError::relation_not_found(relation));
        }
        Ok(columns)
    }

    fn list_relations(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut prepared = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_' AND name <> ?1 \
             ORDER BY name",
        )?;
        let names = prepared
            .query_map([IDENTITY_RELATION], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

fn to_sqlite(value: &SqlValue) -> SqliteValue {
    match value {
        SqlValue::Null => SqliteValue::Null,
        SqlValue::Integer(i) => SqliteValue::Integer(*i),
        SqlValue::Real(f) => SqliteValue::Real(*f),
        SqlValue::Text(s) => SqliteValue::Text(s.clone()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
