//! Error types for query construction.
//!
//! Every check happens when a node is built; rendering a tree never fails.

use std::result;

use thiserror::Error;

/// Errors raised by the query builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// An argument was outside the accepted domain (empty field name, empty
    /// range bound, non-positive boost, zero combinator children).
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// The operation does not apply to this kind of node.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Why the operation was refused.
        message: String,
    },
}

impl QueryError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid-operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns the error message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message } | Self::InvalidOperation { message } => message,
        }
    }
}

/// Result alias for query construction.
pub type Result<T> = result::Result<T, QueryError>;
