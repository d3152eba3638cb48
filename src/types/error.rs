//! Error types for the points ledger
//!
//! This module defines every error that can occur while validating and applying
//! points requests, loading configuration, or issuing tokens.
//!
//! # Error Categories
//!
//! - **Validation Errors**: rejected requests, surfaced with a field tag
//! - **Domain Errors**: unknown accounts, balance overflow
//! - **File I/O and CSV Errors**: missing input, malformed rows
//! - **Configuration and Token Errors**: unreadable secrets, signing failures

use super::account::AccountId;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Request field carrying a point amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsField {
    Spent,
    Added,
}

impl PointsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointsField::Spent => "points_spent",
            PointsField::Added => "points_added",
        }
    }
}

impl fmt::Display for PointsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the points ledger
///
/// Validation variants render exactly the message returned to the caller.
/// Every other variant includes enough context to diagnose the failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A point amount could not be converted to an integer
    #[error("{field} should be a positive integer.")]
    TypeConversion {
        /// The offending field
        field: PointsField,
    },

    /// A point amount was converted but is negative
    #[error("{field} should be a positive integer.")]
    NegativeValue {
        /// The offending field
        field: PointsField,
    },

    /// Neither field carried a non-zero amount
    #[error("No data to update.")]
    NoOperationRequested,

    /// Both fields carried a non-zero amount
    #[error("It is not allowed to add and spend points at the same time.")]
    ConflictingOperation,

    /// Spending would take the balance below zero
    ///
    /// The request is rejected and the account is left unchanged.
    #[error("Not enough points.")]
    InsufficientBalance {
        /// Account ID
        account: AccountId,
        /// Balance at the time of the request
        points: u64,
        /// Requested spend
        requested: u64,
    },

    /// Account does not exist in the store
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Account ID that was looked up
        account: AccountId,
    },

    /// Crediting points would overflow the balance
    #[error("Arithmetic overflow adding {amount} points to account {account}")]
    ArithmeticOverflow {
        /// Account ID
        account: AccountId,
        /// Requested credit
        amount: u64,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed record is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Secrets or environment configuration could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Token could not be signed or verified
    #[error("Token error: {message}")]
    TokenError {
        /// Description from the token library
        message: String,
    },

    /// Async runtime could not be started
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for LedgerError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        LedgerError::TokenError {
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create a TypeConversion error
    pub fn type_conversion(field: PointsField) -> Self {
        LedgerError::TypeConversion { field }
    }

    /// Create a NegativeValue error
    pub fn negative_value(field: PointsField) -> Self {
        LedgerError::NegativeValue { field }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account: AccountId, points: u64, requested: u64) -> Self {
        LedgerError::InsufficientBalance {
            account,
            points,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: AccountId, amount: u64) -> Self {
        LedgerError::ArithmeticOverflow { account, amount }
    }

    /// Create a ConfigError
    pub fn config(message: impl Into<String>) -> Self {
        LedgerError::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error is a rejected request rather than a failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::TypeConversion { .. }
                | LedgerError::NegativeValue { .. }
                | LedgerError::NoOperationRequested
                | LedgerError::ConflictingOperation
                | LedgerError::InsufficientBalance { .. }
        )
    }

    /// Field the error is reported under
    ///
    /// Request-level validation errors are reported under `error`, balance
    /// errors under `points`, and field conversion errors under the field name.
    pub fn field(&self) -> &'static str {
        match self {
            LedgerError::TypeConversion { field } | LedgerError::NegativeValue { field } => {
                field.as_str()
            }
            LedgerError::InsufficientBalance { .. } => "points",
            _ => "error",
        }
    }

    /// Field-tagged error body, e.g. `{"points": ["Not enough points."]}`
    pub fn to_response(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.field().to_string(), json!([self.to_string()]));
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::type_conversion_spent(
        LedgerError::type_conversion(PointsField::Spent),
        "points_spent should be a positive integer."
    )]
    #[case::negative_added(
        LedgerError::negative_value(PointsField::Added),
        "points_added should be a positive integer."
    )]
    #[case::no_operation(LedgerError::NoOperationRequested, "No data to update.")]
    #[case::conflicting(
        LedgerError::ConflictingOperation,
        "It is not allowed to add and spend points at the same time."
    )]
    #[case::insufficient(
        LedgerError::insufficient_balance(AccountId(1), 10, 20),
        "Not enough points."
    )]
    #[case::account_not_found(
        LedgerError::account_not_found(AccountId(42)),
        "Account 42 not found"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(3), message: "bad row".to_string() },
        "CSV parse error at line 3: bad row"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "bad row".to_string() },
        "CSV parse error: bad row"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::spent(LedgerError::type_conversion(PointsField::Spent), "points_spent")]
    #[case::added(LedgerError::negative_value(PointsField::Added), "points_added")]
    #[case::no_operation(LedgerError::NoOperationRequested, "error")]
    #[case::conflicting(LedgerError::ConflictingOperation, "error")]
    #[case::insufficient(LedgerError::insufficient_balance(AccountId(1), 0, 1), "points")]
    fn test_error_field(#[case] error: LedgerError, #[case] expected: &str) {
        assert!(error.is_validation());
        assert_eq!(error.field(), expected);
    }

    #[test]
    fn test_response_body() {
        let body = LedgerError::insufficient_balance(AccountId(1), 10, 20).to_response();
        assert_eq!(body, json!({"points": ["Not enough points."]}));
    }

    #[test]
    fn test_infrastructure_errors_are_not_validation() {
        assert!(!LedgerError::account_not_found(AccountId(1)).is_validation());
        assert!(!LedgerError::config("missing key").is_validation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
