//! Roles, privilege sets and the acting user

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// The seven record privileges a user holds.
///
/// Wire keys contain spaces ("read own"); snake_case spellings are accepted
/// as aliases. Exactly the seven keys must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Privileges {
    pub create: bool,

    #[serde(rename = "read own", alias = "read_own")]
    pub read_own: bool,

    #[serde(rename = "read any", alias = "read_any")]
    pub read_any: bool,

    #[serde(rename = "update own", alias = "update_own")]
    pub update_own: bool,

    #[serde(rename = "update any", alias = "update_any")]
    pub update_any: bool,

    #[serde(rename = "delete own", alias = "delete_own")]
    pub delete_own: bool,

    #[serde(rename = "delete any", alias = "delete_any")]
    pub delete_any: bool,
}

impl Privileges {
    /// Every privilege granted
    pub fn all() -> Self {
        Self {
            create: true,
            read_own: true,
            read_any: true,
            update_own: true,
            update_any: true,
            delete_own: true,
            delete_any: true,
        }
    }
}

/// The authenticated user a request runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
    pub privileges: Privileges,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
