//! DDL generator
//!
//! One relation per content type, named by pluralizing the content type
//! name. Columns, in order: `id` (auto-increment primary key), one column
//! per field, `owner_id` (references the identity relation).

use super::statement::{quote_ident, Statement};
use crate::schema::{ContentTypeDefinition, ContentTypeName, ID_COLUMN, OWNER_COLUMN};

/// Relation holding user identities; content rows reference it.
pub const IDENTITY_RELATION: &str = "users";

/// Builds the create statement for a validated content type.
///
/// The statement fails in the store if the relation already exists; the
/// store reports that as `RelationAlreadyExists`, never as success.
pub fn generate_create(def: &ContentTypeDefinition) -> Statement {
    let mut columns = Vec::with_capacity(def.fields.len() + 2);
    columns.push(format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_ident(ID_COLUMN)
    ));

    for field in &def.fields {
        let mut column = format!(
            "{} {}",
            quote_ident(&field.name),
            field.field_type.column_type()
        );
        if field.required {
            column.push_str(" NOT NULL");
        }
        columns.push(column);
    }

    columns.push(format!(
        "{} INTEGER NOT NULL REFERENCES {}({})",
        quote_ident(OWNER_COLUMN),
        quote_ident(IDENTITY_RELATION),
        quote_ident(ID_COLUMN)
    ));

    Statement::new(format!(
        "CREATE TABLE {} ({})",
        quote_ident(&def.name.relation_name()),
        columns.join(", ")
    ))
}

/// Builds drop statements for one or more content types.
///
/// Dropping an absent relation is not an error. One statement is produced
/// per name because the store executes a single statement at a time.
pub fn generate_drop<'a, I>(names: I) -> Vec<Statement>
where
    I: IntoIterator<Item = &'a ContentTypeName>,
{
    names
        .into_iter()
        .map(|name| {
            Statement::new(format!(
                "DROP TABLE IF EXISTS {}",
                quote_ident(&name.relation_name())
            ))
        })
        .collect()
}

/// Builds the create statement for the identity relation.
pub fn generate_identity_create() -> Statement {
    Statement::new(format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         \"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
         \"username\" TEXT NOT NULL UNIQUE, \
         \"password_hash\" TEXT NOT NULL, \
         \"role\" TEXT NOT NULL, \
         \"privileges\" TEXT NOT NULL)",
        quote_ident(IDENTITY_RELATION)
    ))
}
