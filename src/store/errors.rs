//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse classification of a store failure.
///
/// Callers branch on the kind; the message is for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    RelationNotFound,
    RelationAlreadyExists,
    ConstraintViolation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store error ({kind:?}): {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    pub fn relation_not_found(relation: &str) -> Self {
        Self::new(
            StoreErrorKind::RelationNotFound,
            format!("no such table: {}", relation),
        )
    }

    pub fn is(&self, kind: StoreErrorKind) -> bool {
        self.kind == kind
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        let kind = match &err {
            rusqlite::Error::SqliteFailure(failure, detail) => {
                classify(failure, detail.as_deref().unwrap_or_default())
            }
            // Failures while preparing a statement carry the offending offset.
            rusqlite::Error::SqlInputError { error, msg, .. } => classify(error, msg),
            _ => StoreErrorKind::Other,
        };
        Self { kind, message }
    }
}

fn classify(failure: &rusqlite::ffi::Error, detail: &str) -> StoreErrorKind {
    if detail.starts_with("no such table") {
        StoreErrorKind::RelationNotFound
    } else if detail.contains("already exists") {
        StoreErrorKind::RelationAlreadyExists
    } else if failure.code == rusqlite::ErrorCode::ConstraintViolation {
        StoreErrorKind::ConstraintViolation
    } else {
        StoreErrorKind::Other
    }
}
