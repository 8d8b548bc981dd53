//! # Auth Errors
//!
//! Error types for the identity and authorization module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for user validation
pub type UserResult<T> = Result<T, UserError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================

    /// Unknown username or wrong password (don't leak which)
    #[error("incorrect credentials")]
    InvalidCredentials,

    // ==================
    // JWT Errors
    // ==================

    #[error("malformed token")]
    MalformedToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token signature")]
    InvalidSignature,

    /// Token verified but its subject is gone
    #[error("token subject no longer exists")]
    UnknownSubject,

    // ==================
    // Authorization Errors
    // ==================

    /// No actor attached to the request
    #[error("access denied")]
    AccessDenied,

    #[error("insufficient privileges")]
    InsufficientPrivileges,

    #[error("admin role required")]
    AdminRequired,

    // ==================
    // Internal Errors
    // ==================

    #[error("internal error: password hashing failed")]
    HashingFailed,

    #[error("internal error: token generation failed")]
    TokenGenerationFailed,

    /// A stored user row could not be decoded
    #[error("internal error: malformed user record: {0}")]
    MalformedUser(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::UnknownSubject => 401,

            // 403 Forbidden
            AuthError::AccessDenied => 403,
            AuthError::InsufficientPrivileges => 403,
            AuthError::AdminRequired => 403,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::MalformedUser(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Rejection of a user creation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("field(s) missing")]
    FieldsMissing,

    #[error("username not string")]
    UsernameNotString,

    #[error("username too long")]
    UsernameTooLong,

    #[error("password not string")]
    PasswordNotString,

    #[error("password too short")]
    PasswordTooShort,

    #[error("role must be \"user\" or \"admin\"")]
    InvalidRole,

    #[error("privileges must be an object")]
    PrivilegesNotObject,

    #[error("privileges object must have all the correct keys and no more")]
    PrivilegesKeysMismatch,

    #[error("username already in use")]
    UsernameTaken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AccessDenied.status_code(), 403);
        assert_eq!(AuthError::InsufficientPrivileges.status_code(), 403);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
        assert!(AuthError::AdminRequired.is_client_error());
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("username"));
    }
}
