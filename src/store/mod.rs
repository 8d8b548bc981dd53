//! # Relational Store
//!
//! The data engine talks to its backing database only through [`Store`].
//! Statements arrive fully generated with positional parameters; the store
//! executes them, describes relation columns, and lists relations.
//!
//! [`SqliteStore`] is the bundled implementation.

mod errors;
mod sqlite;

use serde_json::{Map, Value};

pub use errors::{StoreError, StoreErrorKind, StoreResult};
pub use sqlite::SqliteStore;

use crate::sql::Statement;

/// One result row, keyed by column name in select order.
pub type Row = Map<String, Value>;

/// Column metadata as reported by the store, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared column type, verbatim
    pub type_name: String,
    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable,
        }
    }
}

/// Outcome of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// The statement produced a result set (possibly empty)
    Rows(Vec<Row>),
    /// The statement changed data or schema
    Affected { count: u64, last_insert_id: i64 },
}

impl ExecOutcome {
    /// Rows of a result set; statements without one yield no rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ExecOutcome::Rows(rows) => rows,
            ExecOutcome::Affected { .. } => Vec::new(),
        }
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        match self {
            ExecOutcome::Affected { last_insert_id, .. } => Some(*last_insert_id),
            ExecOutcome::Rows(_) => None,
        }
    }
}

/// Relational store collaborator.
///
/// Implementations must be shareable across request handlers.
pub trait Store: Send + Sync {
    /// Executes a single statement with its bound parameters.
    fn execute(&self, statement: &Statement) -> StoreResult<ExecOutcome>;

    /// Describes the columns of `relation` in declaration order.
    ///
    /// # Errors
    ///
    /// `RelationNotFound` if no such relation exists.
    fn describe_columns(&self, relation: &str) -> StoreResult<Vec<ColumnInfo>>;

    /// Lists user relations by name, excluding the identity relation.
    fn list_relations(&self) -> StoreResult<Vec<String>>;
}
