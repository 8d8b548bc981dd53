//! # User Management
//!
//! User model, creation-request validation, and the statements that read
//! and write the identity relation.
//!
//! Users live in the `users` relation; privileges are stored there as a
//! JSON-encoded object and decoded into [`Privileges`] at this boundary.

use serde::Serialize;
use serde_json::Value;

use super::crypto::verify_password;
use super::errors::{AuthError, AuthResult, UserError, UserResult};
use super::privileges::{Actor, Privileges, Role};
use crate::sql::{SqlValue, Statement, IDENTITY_RELATION};
use crate::store::Row;

pub const MAX_USERNAME_LEN: usize = 30;
pub const MIN_PASSWORD_LEN: usize = 5;

/// User model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    pub privileges: Privileges,
}

impl User {
    /// Decodes a full row of the identity relation.
    pub fn from_row(row: &Row) -> AuthResult<Self> {
        let text = |column: &str| {
            row.get(column)
                .and_then(Value::as_str)
                .ok_or_else(|| AuthError::MalformedUser(format!("{} is not text", column)))
        };

        let id = row
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AuthError::MalformedUser("id is not an integer".to_string()))?;
        let role = Role::parse(text("role")?)
            .ok_or_else(|| AuthError::MalformedUser(format!("user {} has an unknown role", id)))?;
        let privileges: Privileges = serde_json::from_str(text("privileges")?)
            .map_err(|e| AuthError::MalformedUser(format!("user {} privileges: {}", id, e)))?;

        Ok(Self {
            id,
            username: text("username")?.to_string(),
            password_hash: text("password_hash")?.to_string(),
            role,
            privileges,
        })
    }

    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            privileges: self.privileges,
        }
    }
}

/// A user creation request that passed validation. The password is still
/// plaintext here and is hashed just before insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub privileges: Privileges,
}

/// Validates a user creation request.
///
/// Checks run in order and the first failure wins: presence of all four
/// fields, username, password, role, then the privileges object.
pub fn validate_new_user(candidate: &Value) -> UserResult<NewUser> {
    let obj = candidate.as_object().ok_or(UserError::FieldsMissing)?;

    let fields = ["username", "password", "role", "privileges"];
    if fields.iter().any(|key| is_blank(obj.get(*key))) {
        return Err(UserError::FieldsMissing);
    }

    let username = obj["username"].as_str().ok_or(UserError::UsernameNotString)?;
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(UserError::UsernameTooLong);
    }

    let password = obj["password"].as_str().ok_or(UserError::PasswordNotString)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::PasswordTooShort);
    }

    let role = obj["role"]
        .as_str()
        .and_then(Role::parse)
        .ok_or(UserError::InvalidRole)?;

    let privileges = obj["privileges"]
        .as_object()
        .ok_or(UserError::PrivilegesNotObject)?;
    if privileges.len() != 7 {
        return Err(UserError::PrivilegesKeysMismatch);
    }
    let privileges: Privileges = serde_json::from_value(Value::Object(privileges.clone()))
        .map_err(|_| UserError::PrivilegesKeysMismatch)?;

    Ok(NewUser {
        username: username.to_string(),
        password: password.to_string(),
        role,
        privileges,
    })
}

/// Absent, null, empty string and `false` all count as missing.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

pub(crate) fn insert_user_statement(user: &NewUser, password_hash: String) -> AuthResult<Statement> {
    let privileges = serde_json::to_string(&user.privileges)
        .map_err(|e| AuthError::MalformedUser(e.to_string()))?;
    Ok(Statement::with_params(
        format!(
            "INSERT INTO \"{}\" (\"username\", \"password_hash\", \"role\", \"privileges\") VALUES (?, ?, ?, ?)",
            IDENTITY_RELATION
        ),
        vec![
            SqlValue::from(user.username.as_str()),
            SqlValue::Text(password_hash),
            SqlValue::from(user.role.as_str()),
            SqlValue::Text(privileges),
        ],
    ))
}

pub(crate) fn select_user_by_id(id: i64) -> Statement {
    Statement::with_params(
        format!("SELECT * FROM \"{}\" WHERE \"id\" = ?", IDENTITY_RELATION),
        vec![SqlValue::Integer(id)],
    )
}

pub(crate) fn select_user_by_username(username: &str) -> Statement {
    Statement::with_params(
        format!("SELECT * FROM \"{}\" WHERE \"username\" = ?", IDENTITY_RELATION),
        vec![SqlValue::from(username)],
    )
}

pub(crate) fn count_users() -> Statement {
    Statement::new(format!("SELECT COUNT(*) AS \"count\" FROM \"{}\"", IDENTITY_RELATION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> Value {
        json!({
            "username": "frodo",
            "password": "mellon",
            "role": "user",
            "privileges": {
                "create": true,
                "read own": true,
                "read any": false,
                "update own": true,
                "update any": false,
                "delete own": true,
                "delete any": false
            }
        })
    }

    #[test]
    fn test_valid_user() {
        let user = validate_new_user(&request()).unwrap();
        assert_eq!(user.username, "frodo");
        assert_eq!(user.role, Role::User);
        assert!(user.privileges.create && !user.privileges.read_any);
    }

    #[test]
    fn test_missing_fields() {
        for key in ["username", "password", "role", "privileges"] {
            let mut req = request();
            req.as_object_mut().unwrap().remove(key);
            assert_eq!(validate_new_user(&req), Err(UserError::FieldsMissing));
        }

        let mut req = request();
        req["username"] = json!("");
        assert_eq!(validate_new_user(&req), Err(UserError::FieldsMissing));
    }

    #[test]
    fn test_username_and_password_rules() {
        let mut req = request();
        req["username"] = json!(7);
        assert_eq!(validate_new_user(&req), Err(UserError::UsernameNotString));

        let mut req = request();
        req["username"] = json!("a".repeat(31));
        assert_eq!(validate_new_user(&req), Err(UserError::UsernameTooLong));

        let mut req = request();
        req["username"] = json!("a".repeat(30));
        assert!(validate_new_user(&req).is_ok());

        let mut req = request();
        req["password"] = json!("abcd");
        assert_eq!(validate_new_user(&req), Err(UserError::PasswordTooShort));
    }

    #[test]
    fn test_role_rule() {
        let mut req = request();
        req["role"] = json!("superuser");
        assert_eq!(validate_new_user(&req), Err(UserError::InvalidRole));
        assert_eq!(
            UserError::InvalidRole.to_string(),
            "role must be \"user\" or \"admin\""
        );
    }

    #[test]
    fn test_privileges_rules() {
        let mut req = request();
        req["privileges"] = json!("all");
        assert_eq!(validate_new_user(&req), Err(UserError::PrivilegesNotObject));

        let mut req = request();
        req["privileges"].as_object_mut().unwrap().remove("delete any");
        assert_eq!(validate_new_user(&req), Err(UserError::PrivilegesKeysMismatch));

        let mut req = request();
        let privs = req["privileges"].as_object_mut().unwrap();
        privs.remove("delete any");
        privs.insert("publish".into(), json!(true));
        assert_eq!(validate_new_user(&req), Err(UserError::PrivilegesKeysMismatch));
    }

    #[test]
    fn test_from_row() {
        let row = json!({
            "id": 3,
            "username": "sam",
            "password_hash": "$argon2id$stub",
            "role": "admin",
            "privileges": serde_json::to_string(&Privileges::all()).unwrap()
        });
        let user = User::from_row(row.as_object().unwrap()).unwrap();
        assert_eq!(user.actor().id, 3);
        assert!(user.actor().is_admin());

        let serialized = serde_json::to_value(&user).unwrap();
        assert!(serialized.get("password_hash").is_none());
    }

    #[test]
    fn test_from_row_rejects_bad_privileges() {
        let row = json!({
            "id": 3,
            "username": "sam",
            "password_hash": "x",
            "role": "user",
            "privileges": "{\"create\": true}"
        });
        assert!(matches!(
            User::from_row(row.as_object().unwrap()),
            Err(AuthError::MalformedUser(_))
        ));
    }
}
