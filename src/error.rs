//! Custom error types for Spendwise
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Spendwise operations
#[derive(Error, Debug)]
pub enum SpendwiseError {
    /// An account referenced by a transaction could not be resolved
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Amount is non-numeric, negative or not finite
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A settlement was requested without a target account
    #[error("Settlement transaction requires a target account")]
    MissingSettlementTarget,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generative insight service errors
    #[error("Insight service error: {0}")]
    Insight(String),

    /// Receipt scanning errors
    #[error("Receipt scan error: {0}")]
    Receipt(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl SpendwiseError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget goal",
            identifier: identifier.into(),
        }
    }

    /// Create an "account not found" error
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::AccountNotFound(identifier.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AccountNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error was raised by a ledger precondition, before any
    /// balance was touched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_) | Self::InvalidAmount(_) | Self::MissingSettlementTarget
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SpendwiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SpendwiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for SpendwiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for Spendwise operations
pub type SpendwiseResult<T> = Result<T, SpendwiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpendwiseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_account_not_found_error() {
        let err = SpendwiseError::account_not_found("Checking");
        assert_eq!(err.to_string(), "Account not found: Checking");
        assert!(err.is_not_found());
        assert!(err.is_precondition());
    }

    #[test]
    fn test_precondition_errors() {
        assert!(SpendwiseError::InvalidAmount("-1".into()).is_precondition());
        assert!(SpendwiseError::MissingSettlementTarget.is_precondition());
        assert!(!SpendwiseError::Storage("disk full".into()).is_precondition());
        assert!(!SpendwiseError::transaction_not_found("txn-1").is_precondition());
    }

    #[test]
    fn test_missing_settlement_target_message() {
        assert_eq!(
            SpendwiseError::MissingSettlementTarget.to_string(),
            "Settlement transaction requires a target account"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SpendwiseError = io_err.into();
        assert!(matches!(err, SpendwiseError::Io(_)));
    }
}
