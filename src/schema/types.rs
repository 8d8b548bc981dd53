//! Content type model
//!
//! Supported field types:
//! - text: UTF-8 string up to 30,000 characters
//! - int: any JSON number
//! - json: a JSON object, supplied encoded or decoded
//!
//! Names of content types and fields share one identifier gate:
//! lowercase letters and underscores only, at most 20 characters.
//! Anything that passed the gate is safe to place in statement text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Longest accepted content type or field name.
pub const MAX_NAME_LEN: usize = 20;

/// System primary key column, never part of the user-visible field list.
pub const ID_COLUMN: &str = "id";

/// System owner column, never part of the user-visible field list.
pub const OWNER_COLUMN: &str = "owner_id";

/// Content type names that would collide with the identity relation once pluralized.
pub const RESERVED_TYPE_NAMES: &[&str] = &["user"];

/// Relation prefix SQLite keeps for its own objects.
pub const RESERVED_TYPE_PREFIX: &str = "sqlite_";

/// Returns true if `name` may not be used for a content type.
pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name) || name.starts_with(RESERVED_TYPE_PREFIX)
}

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z_]+$").expect("identifier pattern is a valid regex"));

/// Returns true if `name` consists only of lowercase letters and underscores.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Returns true if `name` is one of the system-managed columns.
pub fn is_system_column(name: &str) -> bool {
    name == ID_COLUMN || name == OWNER_COLUMN
}

/// Field data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Variable-length text
    Text,
    /// Numeric value
    Int,
    /// JSON object, stored as text
    Json,
}

impl FieldType {
    /// Parses the wire name of a field type.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(FieldType::Text),
            "int" => Some(FieldType::Int),
            "json" => Some(FieldType::Json),
            _ => None,
        }
    }

    /// Returns the wire name of this type
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Json => "json",
        }
    }

    /// Declared column type written by the DDL generator.
    ///
    /// Each field type gets its own declared type so reflection can map it
    /// back exactly instead of guessing from the storage affinity.
    pub fn column_type(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Int => "INTEGER",
            FieldType::Json => "JSON",
        }
    }

    /// Inverse of [`FieldType::column_type`].
    pub fn from_column_type(declared: &str) -> Option<Self> {
        match declared.to_ascii_uppercase().as_str() {
            "TEXT" => Some(FieldType::Text),
            "INTEGER" => Some(FieldType::Int),
            "JSON" => Some(FieldType::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One named, typed slot of a content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field (and column) name
    pub name: String,
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a record may carry an explicit null for this field
    pub required: bool,
}

impl FieldDefinition {
    /// Create a field definition
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
        }
    }

    pub fn required_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text, true)
    }

    pub fn optional_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text, false)
    }

    pub fn required_int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int, true)
    }

    pub fn optional_json(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Json, false)
    }
}

/// A content type name that has passed the identifier gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentTypeName(String);

impl ContentTypeName {
    /// Gates an untrusted name.
    pub fn parse(name: &str) -> SchemaResult<Self> {
        if !is_identifier(name) {
            return Err(SchemaError::InvalidName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(SchemaError::NameTooLong);
        }
        Ok(Self(name.to_string()))
    }

    /// Recovers the content type name from its relation name (`posts` -> `post`).
    pub fn from_relation(relation: &str) -> Option<Self> {
        relation
            .strip_suffix('s')
            .and_then(|name| Self::parse(name).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the backing relation, pluralized by appending `s`.
    pub fn relation_name(&self) -> String {
        format!("{}s", self.0)
    }
}

impl fmt::Display for ContentTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentTypeName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentTypeName::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A named record schema: an ordered list of fields.
///
/// The system columns `id` and `owner_id` are never part of `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDefinition {
    pub name: ContentTypeName,
    pub fields: Vec<FieldDefinition>,
}

impl ContentTypeDefinition {
    pub fn new(name: ContentTypeName, fields: Vec<FieldDefinition>) -> Self {
        Self { name, fields }
    }

    /// Fields the caller supplies on a record, i.e. without `owner_id`.
    pub fn user_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.name != OWNER_COLUMN)
    }
}
