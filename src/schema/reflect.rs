//! Schema reflector
//!
//! Rebuilds a [`ContentTypeDefinition`] from the column metadata the store
//! reports for a relation. This is the inverse of
//! [`crate::sql::ddl::generate_create`]: for any definition the validator
//! accepts, `reflect(describe(generate_create(def))) == def`.
//!
//! Field types come from the declared column type written by the DDL
//! generator, matched exactly. A column whose declared type is not one of
//! those tags means the relation was not created here (or was altered
//! behind our back), and reflection refuses it.

use super::errors::{ReflectError, ReflectResult};
use super::types::{
    is_identifier, ContentTypeDefinition, ContentTypeName, FieldDefinition, FieldType, ID_COLUMN,
    OWNER_COLUMN,
};
use crate::store::ColumnInfo;

/// Reconstructs the content type stored in `name`'s relation.
///
/// The system columns `id` and `owner_id` must both be present and are
/// stripped from the result. Column order is preserved.
pub fn reflect(name: &ContentTypeName, columns: &[ColumnInfo]) -> ReflectResult<ContentTypeDefinition> {
    let relation = name.relation_name();

    require_system_column(&relation, columns, ID_COLUMN)?;
    let owner = require_system_column(&relation, columns, OWNER_COLUMN)?;
    if owner.nullable || FieldType::from_column_type(&owner.type_name) != Some(FieldType::Int) {
        return Err(ReflectError::MalformedSystemColumn {
            relation,
            column: OWNER_COLUMN.to_string(),
        });
    }

    let fields = columns
        .iter()
        .filter(|c| c.name != ID_COLUMN && c.name != OWNER_COLUMN)
        .map(|c| reflect_column(&relation, c))
        .collect::<ReflectResult<Vec<_>>>()?;

    if fields.is_empty() {
        return Err(ReflectError::NoFields(relation));
    }

    Ok(ContentTypeDefinition::new(name.clone(), fields))
}

fn require_system_column<'a>(
    relation: &str,
    columns: &'a [ColumnInfo],
    column: &str,
) -> ReflectResult<&'a ColumnInfo> {
    columns
        .iter()
        .find(|c| c.name == column)
        .ok_or_else(|| ReflectError::MissingSystemColumn {
            relation: relation.to_string(),
            column: column.to_string(),
        })
}

fn reflect_column(relation: &str, column: &ColumnInfo) -> ReflectResult<FieldDefinition> {
    if !is_identifier(&column.name) {
        return Err(ReflectError::InvalidColumnName(relation.to_string()));
    }

    let field_type = FieldType::from_column_type(&column.type_name).ok_or_else(|| {
        ReflectError::UnknownColumnType {
            relation: relation.to_string(),
            column: column.name.clone(),
            declared: column.type_name.clone(),
        }
    })?;

    Ok(FieldDefinition::new(&column.name, field_type, !column.nullable))
}
