//! Record validator
//!
//! A record must carry exactly the content type's fields, no more and no
//! fewer. A field that is not required may hold an explicit `null`, but
//! the key itself must still be present.
//!
//! Type rules:
//! - text: a string of at most 30,000 characters
//! - int: any number
//! - json: an object, or a string that decodes to an object
//!
//! Check order: property count, field names, then type rules.

use serde_json::{Map, Value};

use super::errors::{ContentError, ContentResult};
use crate::schema::{ContentTypeDefinition, FieldDefinition, FieldType};
use crate::sql::SqlValue;

/// Longest accepted text value, in characters.
pub const MAX_TEXT_LEN: usize = 30_000;

/// A record that matched its content type, converted to bound values.
///
/// Entries keep the order in which the caller supplied them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    entries: Vec<(String, SqlValue)>,
}

impl ValidatedRecord {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names, in record order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Bound values, in record order
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.entries.iter().map(|(_, value)| value)
    }
}

/// Validates `record` against `schema`.
///
/// `owner_id` is never expected on the record even if the schema lists it.
///
/// # Errors
///
/// - `WrongPropertyCount` if the number of keys differs from the number of fields
/// - `FieldsMismatch` if a field of the content type is absent
/// - `ConstraintMismatch` if any present value breaks its type rule
pub fn validate_record(record: &Value, schema: &ContentTypeDefinition) -> ContentResult<ValidatedRecord> {
    let obj = record.as_object().ok_or(ContentError::NotAnObject)?;
    let fields: Vec<&FieldDefinition> = schema.user_fields().collect();

    if obj.len() != fields.len() {
        return Err(ContentError::WrongPropertyCount);
    }

    if fields.iter().any(|field| !obj.contains_key(&field.name)) {
        return Err(ContentError::FieldsMismatch);
    }

    let conforms = fields.iter().all(|field| {
        let value = &obj[&field.name];
        (!field.required && value.is_null()) || fits(field.field_type, value)
    });
    if !conforms {
        return Err(ContentError::ConstraintMismatch);
    }

    Ok(ValidatedRecord {
        entries: bind_in_record_order(obj, &fields),
    })
}

fn fits(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Text => value
            .as_str()
            .is_some_and(|s| s.chars().count() <= MAX_TEXT_LEN),
        FieldType::Int => value.is_number(),
        FieldType::Json => decode_json_object(value).is_some(),
    }
}

/// Accepts a decoded object or a string holding an encoded object.
fn decode_json_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(obj)) => Some(obj),
            _ => None,
        },
        _ => None,
    }
}

fn bind_in_record_order(obj: &Map<String, Value>, fields: &[&FieldDefinition]) -> Vec<(String, SqlValue)> {
    obj.iter()
        .filter_map(|(name, value)| {
            let field = fields.iter().find(|f| &f.name == name)?;
            Some((name.clone(), bind(field.field_type, value)))
        })
        .collect()
}

fn bind(field_type: FieldType, value: &Value) -> SqlValue {
    match (field_type, value) {
        (_, Value::Null) => SqlValue::Null,
        (FieldType::Text, Value::String(s)) => SqlValue::Text(s.clone()),
        (FieldType::Int, Value::Number(n)) => SqlValue::from_number(n),
        (FieldType::Json, value) => decode_json_object(value)
            .map(|obj| SqlValue::Text(Value::Object(obj).to_string()))
            .unwrap_or(SqlValue::Null),
        // unreachable after `fits`
        _ => SqlValue::Null,
    }
}
