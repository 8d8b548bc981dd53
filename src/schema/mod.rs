//! Content type schemas
//!
//! A content type is a named, ordered list of typed fields defined at
//! runtime. Each content type is persisted as one relation whose columns
//! are the fields plus the system columns `id` and `owner_id`.
//!
//! # Design Principles
//!
//! - Definitions are validated before any statement is built
//! - Names pass the identifier gate before they reach statement text
//! - Definitions are immutable once created; only create and drop exist
//! - The store is the registry: shape is reflected fresh on every call

mod errors;
mod reflect;
mod types;
mod validator;

pub use errors::{ReflectError, ReflectResult, SchemaError, SchemaResult};
pub use reflect::reflect;
pub use types::{
    is_identifier, is_reserved_type_name, is_system_column, ContentTypeDefinition, ContentTypeName,
    FieldDefinition, FieldType, ID_COLUMN, MAX_NAME_LEN, OWNER_COLUMN, RESERVED_TYPE_NAMES,
    RESERVED_TYPE_PREFIX,
};
pub use validator::validate_definition;
