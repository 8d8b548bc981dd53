//! Content type definition validator
//!
//! Checks run in a fixed order and the first failing class of check wins.
//! Every field is inspected before the field-level verdicts are reported,
//! so a definition with both a bad name and a bad type always reports the
//! bad name.
//!
//! Validation takes the raw JSON body and, on success, returns the typed
//! [`ContentTypeDefinition`]. Nothing is persisted here.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    is_identifier, is_reserved_type_name, is_system_column, ContentTypeDefinition, ContentTypeName,
    FieldDefinition, FieldType, MAX_NAME_LEN,
};

/// Top-level properties a definition may carry.
const DEFINITION_PROPERTIES: usize = 2;

/// Validates a candidate content type definition.
///
/// # Errors
///
/// Returns the first failing [`SchemaError`] in check order:
/// properties, type name, type name length, field names, field name
/// lengths, field types, `required` flags, reserved field names,
/// duplicate field names, reserved type names.
pub fn validate_definition(candidate: &Value) -> SchemaResult<ContentTypeDefinition> {
    let obj = candidate.as_object().ok_or(SchemaError::PropertiesMissing)?;

    let (name, fields) = required_properties(obj)?;
    if obj.len() > DEFINITION_PROPERTIES {
        return Err(SchemaError::TooManyProperties);
    }

    let name = name.as_str().ok_or(SchemaError::InvalidName)?;
    let name = ContentTypeName::parse(name)?;

    let fields = validate_fields(fields)?;

    if is_reserved_type_name(name.as_str()) {
        return Err(SchemaError::ReservedName);
    }

    Ok(ContentTypeDefinition::new(name, fields))
}

/// Extracts `name` and `fields`, treating empty values as missing.
fn required_properties(obj: &Map<String, Value>) -> SchemaResult<(&Value, &[Value])> {
    let name = match obj.get("name") {
        None | Some(Value::Null) => return Err(SchemaError::PropertiesMissing),
        Some(Value::String(s)) if s.is_empty() => return Err(SchemaError::PropertiesMissing),
        Some(name) => name,
    };

    let fields = match obj.get("fields") {
        Some(Value::Array(fields)) if !fields.is_empty() => fields.as_slice(),
        _ => return Err(SchemaError::PropertiesMissing),
    };

    Ok((name, fields))
}

/// Per-check verdicts collected over all fields.
#[derive(Default)]
struct FieldVerdicts {
    bad_name: bool,
    long_name: bool,
    bad_type: bool,
    required_not_bool: bool,
    reserved_name: bool,
    duplicate_name: bool,
}

impl FieldVerdicts {
    fn first_failure(&self) -> Option<SchemaError> {
        [
            (self.bad_name, SchemaError::InvalidFieldName),
            (self.long_name, SchemaError::FieldNameTooLong),
            (self.bad_type, SchemaError::InvalidFieldType),
            (self.required_not_bool, SchemaError::RequiredNotBoolean),
            (self.reserved_name, SchemaError::ReservedFieldName),
            (self.duplicate_name, SchemaError::DuplicateFieldName),
        ]
        .into_iter()
        .find_map(|(failed, err)| failed.then_some(err))
    }
}

fn validate_fields(fields: &[Value]) -> SchemaResult<Vec<FieldDefinition>> {
    let mut verdicts = FieldVerdicts::default();
    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(fields.len());

    for field in fields {
        let name = field.get("name").and_then(Value::as_str);
        let field_type = field
            .get("type")
            .and_then(Value::as_str)
            .and_then(FieldType::parse);
        let required = field.get("required").and_then(Value::as_bool);

        match name {
            Some(name) => {
                if !is_identifier(name) {
                    verdicts.bad_name = true;
                }
                if name.len() > MAX_NAME_LEN {
                    verdicts.long_name = true;
                }
                if is_system_column(name) {
                    verdicts.reserved_name = true;
                }
                if !seen.insert(name) {
                    verdicts.duplicate_name = true;
                }
            }
            None => verdicts.bad_name = true,
        }
        if field_type.is_none() {
            verdicts.bad_type = true;
        }
        if required.is_none() {
            verdicts.required_not_bool = true;
        }

        if let (Some(name), Some(field_type), Some(required)) = (name, field_type, required) {
            parsed.push(FieldDefinition::new(name, field_type, required));
        }
    }

    match verdicts.first_failure() {
        Some(err) => Err(err),
        None => Ok(parsed),
    }
}
