//! Record operations
//!
//! Reads, updates and deletes of a single record look up the record's
//! owner first and hand it to the privilege engine. Listing a whole
//! content type requires `read any`.

use serde_json::{Map, Value};
use tracing::debug;

use super::errors::{ServiceError, ServiceResult};
use super::{system_columns, CmsService, StoredRecord};
use crate::auth::{require_actor, AccessPolicy, Actor};
use crate::content::validate_record;
use crate::schema::{ContentTypeDefinition, ContentTypeName, FieldType, OWNER_COLUMN};
use crate::sql::{
    generate_delete, generate_insert, generate_select_all, generate_select_one,
    generate_select_owner, generate_update,
};
use crate::store::{Row, Store, StoreError};

/// Record ids are positive integers.
pub fn parse_record_id(raw: &str) -> ServiceResult<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::InvalidRecordId);
    }
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ServiceError::InvalidRecordId)
}

impl<S: Store, P: AccessPolicy> CmsService<S, P> {
    /// Validates `body` and inserts it, owned by the actor.
    pub fn create_record(&self, actor: Option<&Actor>, type_name: &str, body: &Value) -> ServiceResult<StoredRecord> {
        let actor = require_actor(actor)?;
        self.policy.can_create(actor)?;

        let name = ContentTypeName::parse(type_name)?;
        let definition = self.load_definition(&name)?;
        let record = validate_record(body, &definition)?;

        let outcome = self.execute_on(&name, &generate_insert(&record, &name, actor.id))?;
        let id = outcome
            .last_insert_id()
            .ok_or_else(|| StoreError::other("insert reported no row id"))?;

        debug!(content_type = %name, id, owner = actor.id, "record created");
        self.fetch_record(&definition, id)
    }

    pub fn read_record(&self, actor: Option<&Actor>, type_name: &str, id: &str) -> ServiceResult<StoredRecord> {
        let actor = require_actor(actor)?;
        let name = ContentTypeName::parse(type_name)?;
        let id = parse_record_id(id)?;
        let definition = self.load_definition(&name)?;

        let owner = self.owner_of(&name, id)?;
        self.policy.can_read(actor, owner)?;

        self.fetch_record(&definition, id)
    }

    /// All records of a content type, ordered by id.
    pub fn list_records(&self, actor: Option<&Actor>, type_name: &str) -> ServiceResult<Vec<StoredRecord>> {
        let actor = require_actor(actor)?;
        self.policy.can_read_all(actor)?;

        let name = ContentTypeName::parse(type_name)?;
        let definition = self.load_definition(&name)?;

        let rows = self.execute_on(&name, &generate_select_all(&name))?.into_rows();
        debug!(content_type = %name, count = rows.len(), "records listed");
        rows.iter().map(|row| decode_record(&definition, row)).collect()
    }

    /// Replaces every field of an existing record. Ownership does not change.
    pub fn update_record(
        &self,
        actor: Option<&Actor>,
        type_name: &str,
        id: &str,
        body: &Value,
    ) -> ServiceResult<StoredRecord> {
        let actor = require_actor(actor)?;
        let name = ContentTypeName::parse(type_name)?;
        let id = parse_record_id(id)?;
        let definition = self.load_definition(&name)?;

        let owner = self.owner_of(&name, id)?;
        self.policy.can_update(actor, owner)?;

        let record = validate_record(body, &definition)?;
        self.execute_on(&name, &generate_update(&record, &name, id))?;

        debug!(content_type = %name, id, actor = actor.id, "record updated");
        self.fetch_record(&definition, id)
    }

    pub fn delete_record(&self, actor: Option<&Actor>, type_name: &str, id: &str) -> ServiceResult<()> {
        let actor = require_actor(actor)?;
        let name = ContentTypeName::parse(type_name)?;
        let id = parse_record_id(id)?;
        self.load_definition(&name)?;

        let owner = self.owner_of(&name, id)?;
        self.policy.can_delete(actor, owner)?;

        self.execute_on(&name, &generate_delete(&name, id))?;
        debug!(content_type = %name, id, actor = actor.id, "record deleted");
        Ok(())
    }

    fn owner_of(&self, name: &ContentTypeName, id: i64) -> ServiceResult<i64> {
        self.execute_on(name, &generate_select_owner(name, id))?
            .into_rows()
            .first()
            .and_then(|row| row.get(OWNER_COLUMN))
            .and_then(Value::as_i64)
            .ok_or(ServiceError::RecordNotFound)
    }

    fn fetch_record(&self, definition: &ContentTypeDefinition, id: i64) -> ServiceResult<StoredRecord> {
        let rows = self
            .execute_on(&definition.name, &generate_select_one(&definition.name, id))?
            .into_rows();
        let row = rows.first().ok_or(ServiceError::RecordNotFound)?;
        decode_record(definition, row)
    }
}

/// Builds a [`StoredRecord`] in field order, decoding JSON fields.
fn decode_record(definition: &ContentTypeDefinition, row: &Row) -> ServiceResult<StoredRecord> {
    let (id, owner_id) = system_columns(row).ok_or_else(|| {
        ServiceError::StoreFailure(StoreError::other(format!(
            "row of {} is missing its system columns",
            definition.name.relation_name()
        )))
    })?;

    let mut fields = Map::new();
    for field in definition.user_fields() {
        let raw = row.get(&field.name).cloned().unwrap_or(Value::Null);
        let value = match (field.field_type, raw) {
            (FieldType::Json, Value::String(text)) => {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            }
            (_, other) => other,
        };
        fields.insert(field.name.clone(), value);
    }

    Ok(StoredRecord { id, owner_id, fields })
}
