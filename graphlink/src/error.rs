// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types and driver-error translation
//!
//! [`GraphError`] is the taxonomy surfaced to application code. Driver
//! failures go through [`translate_driver_error`], the single step that
//! rewrites recognized failure categories into this taxonomy; anything it
//! does not recognize propagates unchanged inside [`GraphError::Driver`].

use crate::driver::types::DriverError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// Could not reach or connect to the database
    #[error("Connection error: {0}")]
    Connection(String),

    /// Credentials were rejected or permissions are missing
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The statement was rejected by the server
    #[error("Invalid query [{code}]: {message}")]
    InvalidQuery { code: String, message: String },

    /// A schema constraint was violated
    #[error("Constraint violation [{code}]: {message}")]
    ConstraintViolation { code: String, message: String },

    /// A transient failure that may succeed on retry
    #[error("Transient error [{code}]: {message}")]
    Transient { code: String, message: String },

    /// Transaction could not be started, committed or rolled back
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// More results than the fetch cardinality allows
    #[error("Expected at most {expected} result(s), but the query returned {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },

    /// A required single result was absent
    #[error("No result found where exactly one was required")]
    NoResult,

    /// An invalid target database name was supplied
    #[error("Invalid database name: '{0}'")]
    InvalidDatabaseName(String),

    /// The same parameter was bound twice in one statement
    #[error("Duplicate parameter: '{0}'")]
    DuplicateParameter(String),

    /// Record-to-type mapping failed
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization errors from the serde bridge
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An untranslated driver failure, passed through unchanged
    #[error("Driver error: {0}")]
    Driver(DriverError),
}

impl GraphError {
    /// Create a mapping error
    pub fn mapping<S: Into<String>>(msg: S) -> Self {
        Self::Mapping(msg.into())
    }

    /// Create a transaction error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Whether a retry of the failed operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Translate a driver failure into the client taxonomy where a category is
/// recognized, returning the original error unchanged otherwise.
///
/// Server failures are classified by their vendor status code
/// (`Neo.<class>.<category>.<title>`).
pub fn translate_driver_error(err: DriverError) -> GraphError {
    match err {
        DriverError::Connection(msg) => GraphError::Connection(msg),
        DriverError::Authentication(msg) => GraphError::Unauthorized(msg),
        DriverError::Server { code, message } => translate_server_code(code, message),
        other => GraphError::Driver(other),
    }
}

fn translate_server_code(code: String, message: String) -> GraphError {
    if code.starts_with("Neo.ClientError.Security.") {
        return GraphError::Unauthorized(message);
    }
    if code.starts_with("Neo.ClientError.Schema.ConstraintValidationFailed")
        || code.starts_with("Neo.ClientError.Schema.ConstraintViolation")
    {
        return GraphError::ConstraintViolation { code, message };
    }
    if code.starts_with("Neo.ClientError.Statement.") {
        return GraphError::InvalidQuery { code, message };
    }
    if code.starts_with("Neo.ClientError.Transaction.") {
        return GraphError::Transaction(format!("[{}] {}", code, message));
    }
    if code.starts_with("Neo.TransientError.") {
        return GraphError::Transient { code, message };
    }
    // Unrecognized category: pass the original failure through unchanged.
    GraphError::Driver(DriverError::Server { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(code: &str) -> DriverError {
        DriverError::server(code, "boom")
    }

    #[test]
    fn test_security_codes_translate_to_unauthorized() {
        let err = translate_driver_error(server("Neo.ClientError.Security.Unauthorized"));
        assert!(matches!(err, GraphError::Unauthorized(_)));
    }

    #[test]
    fn test_constraint_codes_translate() {
        let err = translate_driver_error(server(
            "Neo.ClientError.Schema.ConstraintValidationFailed",
        ));
        assert!(matches!(err, GraphError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_syntax_codes_translate() {
        let err = translate_driver_error(server("Neo.ClientError.Statement.SyntaxError"));
        assert!(matches!(err, GraphError::InvalidQuery { .. }));
    }

    #[test]
    fn test_transient_codes_translate() {
        let err = translate_driver_error(server("Neo.TransientError.General.TransactionMemoryLimit"));
        assert!(matches!(err, GraphError::Transient { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_unrecognized_codes_pass_through_unchanged() {
        let err = translate_driver_error(server("Neo.DatabaseError.General.UnknownError"));
        match err {
            GraphError::Driver(DriverError::Server { code, .. }) => {
                assert_eq!(code, "Neo.DatabaseError.General.UnknownError");
            }
            other => panic!("expected pass-through, got {:?}", other),
        }
    }

    #[test]
    fn test_protocol_errors_pass_through_unchanged() {
        let err = translate_driver_error(DriverError::Protocol("unexpected message".to_string()));
        assert!(matches!(err, GraphError::Driver(DriverError::Protocol(_))));
    }
}
