//! # Auth Module
//!
//! Identity and authorization: users and their privilege sets, password
//! hashing, bearer tokens, and the privilege engine that decides whether
//! an actor may create, read, update or delete a record.

pub mod crypto;
pub mod engine;
pub mod errors;
pub mod jwt;
pub mod privileges;
pub mod user;

pub use engine::{require_actor, AccessPolicy, PrivilegeEngine, RecordAction};
pub use errors::{AuthError, AuthResult, UserError, UserResult};
pub use jwt::{IssuedToken, JwtClaims, JwtConfig, TokenIssuer, TokenResponse, TOKEN_ISSUER};
pub use privileges::{Actor, Privileges, Role};
pub use user::{validate_new_user, NewUser, User};
