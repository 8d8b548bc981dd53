//! # Schema Errors
//!
//! The `Display` text of every [`SchemaError`] is the reason string handed
//! back to callers, so it must stay stable.

use thiserror::Error;

/// Result type for schema validation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for schema reflection
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Rejection of a candidate content type definition.
///
/// Variants are listed in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("properties missing")]
    PropertiesMissing,

    #[error("too many properties")]
    TooManyProperties,

    #[error("invalid content type name")]
    InvalidName,

    #[error("content type name too long")]
    NameTooLong,

    #[error("invalid field name(s)")]
    InvalidFieldName,

    #[error("field name(s) too long")]
    FieldNameTooLong,

    #[error("invalid field type(s)")]
    InvalidFieldType,

    #[error("required is not a boolean")]
    RequiredNotBoolean,

    #[error("reserved field name(s)")]
    ReservedFieldName,

    #[error("duplicate field name(s)")]
    DuplicateFieldName,

    #[error("reserved content type name")]
    ReservedName,
}

/// Stored structure that does not map back onto a content type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("relation {relation} is missing system column {column}")]
    MissingSystemColumn { relation: String, column: String },

    #[error("relation {relation} has column {column} with untagged type {declared:?}")]
    UnknownColumnType {
        relation: String,
        column: String,
        declared: String,
    },

    #[error("relation {relation} has system column {column} with unexpected shape")]
    MalformedSystemColumn { relation: String, column: String },

    #[error("relation {0} has no content fields")]
    NoFields(String),

    #[error("relation {0} has a column name outside the identifier gate")]
    InvalidColumnName(String),
}
