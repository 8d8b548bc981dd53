//! DML generator
//!
//! Column names come from a [`ValidatedRecord`], whose keys have already
//! been matched against a reflected content type, so they are gated
//! identifiers. Values are always bound parameters.

use super::statement::{quote_ident, SqlValue, Statement};
use crate::content::ValidatedRecord;
use crate::schema::{ContentTypeName, ID_COLUMN, OWNER_COLUMN};

/// Builds an insert for `record`, owned by `owner_id`.
///
/// Columns follow the record's own order with `owner_id` last; the
/// parameter list is the record values followed by the owner id.
pub fn generate_insert(
    record: &ValidatedRecord,
    type_name: &ContentTypeName,
    owner_id: i64,
) -> Statement {
    let mut columns: Vec<String> = record.columns().map(quote_ident).collect();
    columns.push(quote_ident(OWNER_COLUMN));

    let placeholders = vec!["?"; columns.len()].join(", ");

    let mut params: Vec<SqlValue> = record.values().cloned().collect();
    params.push(SqlValue::Integer(owner_id));

    Statement::with_params(
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&type_name.relation_name()),
            columns.join(", "),
            placeholders
        ),
        params,
    )
}

/// Builds an update of every field in `record` on the row `id`.
///
/// `owner_id` is never assigned; a record's owner is fixed at creation.
pub fn generate_update(record: &ValidatedRecord, type_name: &ContentTypeName, id: i64) -> Statement {
    let assignments: Vec<String> = record
        .columns()
        .map(|column| format!("{} = ?", quote_ident(column)))
        .collect();

    let mut params: Vec<SqlValue> = record.values().cloned().collect();
    params.push(SqlValue::Integer(id));

    Statement::with_params(
        format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(&type_name.relation_name()),
            assignments.join(", "),
            quote_ident(ID_COLUMN)
        ),
        params,
    )
}

/// Looks up the owner of row `id`.
pub fn generate_select_owner(type_name: &ContentTypeName, id: i64) -> Statement {
    Statement::with_params(
        format!(
            "SELECT {} FROM {} WHERE {} = ?",
            quote_ident(OWNER_COLUMN),
            quote_ident(&type_name.relation_name()),
            quote_ident(ID_COLUMN)
        ),
        vec![SqlValue::Integer(id)],
    )
}

/// Fetches row `id` with every column.
pub fn generate_select_one(type_name: &ContentTypeName, id: i64) -> Statement {
    Statement::with_params(
        format!(
            "SELECT * FROM {} WHERE {} = ?",
            quote_ident(&type_name.relation_name()),
            quote_ident(ID_COLUMN)
        ),
        vec![SqlValue::Integer(id)],
    )
}

/// Fetches every row, oldest first.
pub fn generate_select_all(type_name: &ContentTypeName) -> Statement {
    Statement::new(format!(
        "SELECT * FROM {} ORDER BY {}",
        quote_ident(&type_name.relation_name()),
        quote_ident(ID_COLUMN)
    ))
}

/// Deletes row `id`.
pub fn generate_delete(type_name: &ContentTypeName, id: i64) -> Statement {
    Statement::with_params(
        format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(&type_name.relation_name()),
            quote_ident(ID_COLUMN)
        ),
        vec![SqlValue::Integer(id)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::validate_record;
    use crate::schema::{ContentTypeDefinition, FieldDefinition, FieldType};
    use serde_json::json;

    fn post() -> ContentTypeDefinition {
        ContentTypeDefinition::new(
            ContentTypeName::parse("post").unwrap(),
            vec![
                FieldDefinition::required_text("title"),
                FieldDefinition::required_text("body"),
                FieldDefinition::optional_text("image_ref"),
            ],
        )
    }

    #[test]
    fn test_insert_appends_owner() {
        let def = post();
        let record = validate_record(
            &json!({ "body": "text", "title": "A New Start", "image_ref": null }),
            &def,
        )
        .unwrap();

        let stmt = generate_insert(&record, &def.name, 7);
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"posts\" (\"body\", \"title\", \"image_ref\", \"owner_id\") VALUES (?, ?, ?, ?)"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Text("text".into()),
                SqlValue::Text("A New Start".into()),
                SqlValue::Null,
                SqlValue::Integer(7),
            ]
        );
        assert_eq!(stmt.params.len(), record.len() + 1);
    }

    #[test]
    fn test_update_targets_id_last() {
        let def = post();
        let record = validate_record(
            &json!({ "title": "t", "body": "b", "image_ref": "/img.png" }),
            &def,
        )
        .unwrap();

        let stmt = generate_update(&record, &def.name, 3);
        assert_eq!(
            stmt.sql,
            "UPDATE \"posts\" SET \"title\" = ?, \"body\" = ?, \"image_ref\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(stmt.params.last(), Some(&SqlValue::Integer(3)));
        assert!(!stmt.sql.contains("owner_id"));
    }

    #[test]
    fn test_values_never_reach_statement_text() {
        let def = ContentTypeDefinition::new(
            ContentTypeName::parse("note").unwrap(),
            vec![FieldDefinition::new("body", FieldType::Text, true)],
        );
        let hostile = "'); DROP TABLE users; --";
        let record = validate_record(&json!({ "body": hostile }), &def).unwrap();

        let stmt = generate_insert(&record, &def.name, 1);
        assert!(!stmt.sql.contains("DROP"));
        assert_eq!(stmt.params[0], SqlValue::Text(hostile.into()));
    }

    #[test]
    fn test_row_statements_bind_id() {
        let name = ContentTypeName::parse("post").unwrap();
        assert_eq!(
            generate_select_owner(&name, 5),
            Statement::with_params(
                "SELECT \"owner_id\" FROM \"posts\" WHERE \"id\" = ?",
                vec![SqlValue::Integer(5)]
            )
        );
        assert_eq!(generate_delete(&name, 5).params, vec![SqlValue::Integer(5)]);
        assert_eq!(generate_select_one(&name, 5).sql, "SELECT * FROM \"posts\" WHERE \"id\" = ?");
        assert_eq!(generate_select_all(&name).sql, "SELECT * FROM \"posts\" ORDER BY \"id\"");
    }
}
