//! # Service Errors
//!
//! Every failure the data engine reports, each carrying the reason string
//! surfaced to callers and an HTTP status.

use thiserror::Error;

use crate::auth::{AuthError, UserError};
use crate::content::ContentError;
use crate::schema::{ContentTypeName, ReflectError, SchemaError};
use crate::store::{StoreError, StoreErrorKind};

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    SchemaInvalid(#[from] SchemaError),

    #[error("{0}")]
    ContentInvalid(#[from] ContentError),

    #[error("{0}")]
    UserInvalid(#[from] UserError),

    #[error("invalid record id")]
    InvalidRecordId,

    #[error("no content type with that name exists")]
    RelationNotFound(ContentTypeName),

    #[error("no content with that id exists")]
    RecordNotFound,

    #[error("no user exists with this id")]
    UserNotFound,

    #[error("a content type already exists with that name")]
    AlreadyExists(ContentTypeName),

    #[error("{0}")]
    AuthorizationDenied(#[from] AuthError),

    #[error("{0}")]
    StoreFailure(#[from] StoreError),
}

impl ServiceError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::SchemaInvalid(_) => 400,
            ServiceError::ContentInvalid(_) => 400,
            ServiceError::UserInvalid(UserError::UsernameTaken) => 409,
            ServiceError::UserInvalid(_) => 400,
            ServiceError::InvalidRecordId => 400,
            ServiceError::RelationNotFound(_) => 404,
            ServiceError::RecordNotFound => 404,
            ServiceError::UserNotFound => 404,
            ServiceError::AlreadyExists(_) => 409,
            ServiceError::AuthorizationDenied(e) => e.status_code(),
            ServiceError::StoreFailure(e) if e.is(StoreErrorKind::ConstraintViolation) => 409,
            ServiceError::StoreFailure(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Reason string safe to show a client. Store internals stay in logs.
    pub fn public_reason(&self) -> String {
        match self {
            ServiceError::StoreFailure(e) if e.is(StoreErrorKind::ConstraintViolation) => {
                "constraint violation".to_string()
            }
            ServiceError::StoreFailure(_) => "internal store error".to_string(),
            other => other.to_string(),
        }
    }

    /// Maps a store failure on `name`'s relation, turning a vanished
    /// relation into `RelationNotFound`.
    pub(crate) fn on_relation(err: StoreError, name: &ContentTypeName) -> Self {
        match err.kind {
            StoreErrorKind::RelationNotFound => ServiceError::RelationNotFound(name.clone()),
            StoreErrorKind::RelationAlreadyExists => ServiceError::AlreadyExists(name.clone()),
            _ => ServiceError::StoreFailure(err),
        }
    }
}

/// A relation that cannot be reflected is a store-level inconsistency.
impl From<ReflectError> for ServiceError {
    fn from(err: ReflectError) -> Self {
        ServiceError::StoreFailure(StoreError::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::from(SchemaError::PropertiesMissing).status_code(), 400);
        assert_eq!(ServiceError::from(ContentError::FieldsMismatch).status_code(), 400);
        assert_eq!(ServiceError::from(UserError::UsernameTaken).status_code(), 409);
        assert_eq!(ServiceError::RecordNotFound.status_code(), 404);
        assert_eq!(ServiceError::from(AuthError::AccessDenied).status_code(), 403);
        assert_eq!(ServiceError::from(StoreError::other("disk")).status_code(), 500);
    }

    #[test]
    fn test_reasons_pass_through() {
        assert_eq!(
            ServiceError::from(SchemaError::TooManyProperties).to_string(),
            "too many properties"
        );
        assert_eq!(
            ServiceError::from(AuthError::InsufficientPrivileges).to_string(),
            "insufficient privileges"
        );
    }

    #[test]
    fn test_store_details_are_not_public() {
        let err = ServiceError::from(StoreError::other("near \"DROP\": syntax error"));
        assert_eq!(err.public_reason(), "internal store error");
    }

    #[test]
    fn test_on_relation_mapping() {
        let name = ContentTypeName::parse("post").unwrap();
        let err = ServiceError::on_relation(StoreError::relation_not_found("posts"), &name);
        assert_eq!(err, ServiceError::RelationNotFound(name));
    }
}
