//! # Content Errors
//!
//! Reason strings returned when a record does not fit its content type.

use thiserror::Error;

/// Result type for content validation
pub type ContentResult<T> = Result<T, ContentError>;

/// Rejection of a record instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("content must be an object")]
    NotAnObject,

    #[error("wrong number of properties on content object")]
    WrongPropertyCount,

    #[error("content fields do not match content type fields")]
    FieldsMismatch,

    #[error("one or more content fields does not fit the constraints of its field type")]
    ConstraintMismatch,
}
