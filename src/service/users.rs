//! User operations and login

use serde_json::{json, Value};
use tracing::{info, warn};

use super::errors::{ServiceError, ServiceResult};
use super::records::parse_record_id;
use super::{integer_column, CmsService};
use crate::auth::crypto::hash_password;
use crate::auth::user::{count_users, insert_user_statement, select_user_by_id, select_user_by_username};
use crate::auth::{
    require_actor, validate_new_user, AccessPolicy, Actor, AuthError, NewUser, Privileges, Role, User,
    UserError,
};
use crate::store::{Store, StoreError, StoreErrorKind};

impl<S: Store, P: AccessPolicy> CmsService<S, P> {
    /// Validates `body` and creates the user. Admin only.
    pub fn create_user(&self, actor: Option<&Actor>, body: &Value) -> ServiceResult<User> {
        let actor = require_actor(actor)?;
        self.policy.can_administer(actor)?;

        let new_user = validate_new_user(body)?;
        let user = self.insert_user(&new_user)?;
        info!(user = user.id, username = %user.username, role = user.role.as_str(), actor = actor.id, "user created");
        Ok(user)
    }

    /// Fetches a user by id. Admin only.
    pub fn get_user(&self, actor: Option<&Actor>, id: &str) -> ServiceResult<User> {
        let actor = require_actor(actor)?;
        self.policy.can_administer(actor)?;

        let id = parse_record_id(id)?;
        self.find_user(id)?.ok_or(ServiceError::UserNotFound)
    }

    /// Checks a username and password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let rows = self.query_rows(&select_user_by_username(username))?;
        let Some(row) = rows.first() else {
            warn!(username = %username, "login for unknown username");
            return Err(AuthError::InvalidCredentials.into());
        };

        let user = User::from_row(row)?;
        if !user.verify_password(password)? {
            warn!(user = user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user = user.id, "login successful");
        Ok(user)
    }

    /// Resolves a token subject to its current user row.
    pub fn resolve_user(&self, user_id: i64) -> ServiceResult<User> {
        self.find_user(user_id)?
            .ok_or_else(|| AuthError::UnknownSubject.into())
    }

    /// Resolves a token subject to the current actor, re-reading the
    /// user's role and privileges.
    pub fn resolve_actor(&self, user_id: i64) -> ServiceResult<Actor> {
        self.resolve_user(user_id).map(|user| user.actor())
    }

    /// Creates the first administrator. Does nothing once any user exists.
    ///
    /// Returns the new user, or `None` if users were already present.
    pub fn seed_admin(&self, username: &str, password: &str) -> ServiceResult<Option<User>> {
        let existing = self
            .query_rows(&count_users())?
            .first()
            .and_then(|row| integer_column(row, "count"))
            .unwrap_or(0);
        if existing > 0 {
            return Ok(None);
        }

        let body = json!({
            "username": username,
            "password": password,
            "role": Role::Admin,
            "privileges": Privileges::all(),
        });
        let validated = validate_new_user(&body)?;
        let user = self.insert_user(&validated)?;
        info!(user = user.id, username = %user.username, "administrator seeded");
        Ok(Some(user))
    }

    fn find_user(&self, id: i64) -> ServiceResult<Option<User>> {
        let rows = self.query_rows(&select_user_by_id(id))?;
        rows.first().map(User::from_row).transpose().map_err(Into::into)
    }

    fn insert_user(&self, new_user: &NewUser) -> ServiceResult<User> {
        if !self.query_rows(&select_user_by_username(&new_user.username))?.is_empty() {
            return Err(UserError::UsernameTaken.into());
        }

        let hash = hash_password(&new_user.password)?;
        let outcome = self
            .store
            .execute(&insert_user_statement(new_user, hash)?)
            .map_err(|e| match e.kind {
                StoreErrorKind::ConstraintViolation => UserError::UsernameTaken.into(),
                _ => ServiceError::StoreFailure(e),
            })?;
        let id = outcome
            .last_insert_id()
            .ok_or_else(|| StoreError::other("insert reported no row id"))?;

        self.find_user(id)?.ok_or(ServiceError::UserNotFound)
    }
}
