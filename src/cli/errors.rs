//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed and the process exits non-zero.

use std::io;

use thiserror::Error;

use crate::service::ServiceError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error
    IoError,
    /// Database could not be opened or prepared
    StoreError,
    /// Seeding the administrator failed
    InitFailed,
    /// Server failed to start or stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TYPEDCMS_CLI_CONFIG_ERROR",
            Self::IoError => "TYPEDCMS_CLI_IO_ERROR",
            Self::StoreError => "TYPEDCMS_CLI_STORE_ERROR",
            Self::InitFailed => "TYPEDCMS_CLI_INIT_FAILED",
            Self::ServeFailed => "TYPEDCMS_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {}", .code.code(), .message)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InitFailed, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::IoError, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        Self::init_failed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
