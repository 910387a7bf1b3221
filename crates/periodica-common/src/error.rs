//! Error types and error codes for Periodica
//!
//! This module defines:
//! - `PeriodicaError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum PeriodicaError {
    /// Request body or parameters rejected before touching storage
    #[error("caused: {0}")]
    IllegalArgument(String),

    /// A backend was requested that is not configured
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The database could not be reached or opened
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    /// File I/O failure on the document store
    #[error("storage error: {0}")]
    StorageError(String),

    /// Duplicate identity rejected by the relational layer
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

pub const CONFIGURATION_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "configuration error",
};
