//! # Privilege Engine
//!
//! Per-request authorization against the acting user's role and
//! privileges. Ownership is decided by the caller, who reads the record's
//! `owner_id` before asking.
//!
//! ## Rules
//! - No actor: always "access denied"
//! - Schema and user management: admin role only
//! - create: the `create` privilege
//! - read/update/delete: the `any` privilege, or the `own` privilege on an owned record
//! - listing a whole content type: `read any`

use tracing::debug;

use super::errors::{AuthError, AuthResult};
use super::privileges::Actor;

/// Record operations subject to privilege checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    Read,
    Update,
    Delete,
}

/// Authorization policy consulted by the data engine.
pub trait AccessPolicy: Send + Sync {
    /// Gate for schema and user management.
    fn can_administer(&self, actor: &Actor) -> AuthResult<()>;

    fn can_create(&self, actor: &Actor) -> AuthResult<()>;

    /// Gate for an action on one existing record owned by `owner_id`.
    fn can_act_on(&self, actor: &Actor, action: RecordAction, owner_id: i64) -> AuthResult<()>;

    fn can_read(&self, actor: &Actor, owner_id: i64) -> AuthResult<()> {
        self.can_act_on(actor, RecordAction::Read, owner_id)
    }

    fn can_update(&self, actor: &Actor, owner_id: i64) -> AuthResult<()> {
        self.can_act_on(actor, RecordAction::Update, owner_id)
    }

    fn can_delete(&self, actor: &Actor, owner_id: i64) -> AuthResult<()> {
        self.can_act_on(actor, RecordAction::Delete, owner_id)
    }

    fn can_read_all(&self, actor: &Actor) -> AuthResult<()>;
}

/// Unwraps the request's actor, denying anonymous callers.
pub fn require_actor(actor: Option<&Actor>) -> AuthResult<&Actor> {
    actor.ok_or(AuthError::AccessDenied)
}

/// Default policy over the seven stored privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegeEngine;

impl PrivilegeEngine {
    pub fn new() -> Self {
        Self
    }
}

fn grant(allowed: bool) -> AuthResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AuthError::InsufficientPrivileges)
    }
}

impl AccessPolicy for PrivilegeEngine {
    fn can_administer(&self, actor: &Actor) -> AuthResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            debug!(actor = actor.id, "admin role required");
            Err(AuthError::AdminRequired)
        }
    }

    fn can_create(&self, actor: &Actor) -> AuthResult<()> {
        grant(actor.privileges.create)
    }

    fn can_act_on(&self, actor: &Actor, action: RecordAction, owner_id: i64) -> AuthResult<()> {
        let p = &actor.privileges;
        let (any, own) = match action {
            RecordAction::Read => (p.read_any, p.read_own),
            RecordAction::Update => (p.update_any, p.update_own),
            RecordAction::Delete => (p.delete_any, p.delete_own),
        };
        let owns = actor.id == owner_id;
        debug!(actor = actor.id, owner = owner_id, ?action, owns, "record privilege check");
        grant(any || (own && owns))
    }

    fn can_read_all(&self, actor: &Actor) -> AuthResult<()> {
        grant(actor.privileges.read_any)
    }
}
