//! # Data Engine Service
//!
//! [`CmsService`] runs every content type, record and user operation. Each
//! call takes the acting user (or `None` for anonymous callers) and walks
//! the same pipeline: actor check, privilege engine, name gate, schema
//! reflection, validation, statement generation, store.
//!
//! The schema is never cached: every record operation reflects the content
//! type fresh from the store.

mod content_types;
mod errors;
mod records;
mod users;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

pub use errors::{ServiceError, ServiceResult};
pub use records::parse_record_id;

use crate::auth::{AccessPolicy, PrivilegeEngine};
use crate::schema::{ContentTypeName, ID_COLUMN, OWNER_COLUMN};
use crate::sql::Statement;
use crate::store::{ExecOutcome, Row, Store};

/// A record as read back from its relation.
///
/// JSON fields are decoded; serialized, the field values sit beside `id`
/// and `owner_id` at the top level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    pub owner_id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StoredRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// The schema-driven data engine over a store `S` and policy `P`.
pub struct CmsService<S: Store, P: AccessPolicy = PrivilegeEngine> {
    store: Arc<S>,
    policy: P,
}

impl<S: Store> CmsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, PrivilegeEngine::new())
    }
}

impl<S: Store, P: AccessPolicy> CmsService<S, P> {
    pub fn with_policy(store: Arc<S>, policy: P) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn execute(&self, statement: &Statement) -> ServiceResult<ExecOutcome> {
        Ok(self.store.execute(statement)?)
    }

    /// Executes against a content type's relation, mapping a missing
    /// relation to `RelationNotFound`.
    fn execute_on(&self, name: &ContentTypeName, statement: &Statement) -> ServiceResult<ExecOutcome> {
        self.store
            .execute(statement)
            .map_err(|e| ServiceError::on_relation(e, name))
    }

    fn query_rows(&self, statement: &Statement) -> ServiceResult<Vec<Row>> {
        Ok(self.execute(statement)?.into_rows())
    }
}

fn integer_column(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(Value::as_i64)
}

fn system_columns(row: &Row) -> Option<(i64, i64)> {
    Some((integer_column(row, ID_COLUMN)?, integer_column(row, OWNER_COLUMN)?))
}
