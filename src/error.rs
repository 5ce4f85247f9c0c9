//! Error types for the SWIFT code directory

use thiserror::Error;

use crate::db::StoreError;

/// Result type for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Message used when a validation failure carries neither context nor violations
pub const VALIDATION_FALLBACK_MESSAGE: &str = "BankSwift validation failed";

/// Directory errors
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Add with a code that already exists
    #[error("SWIFT code already exists: {0}")]
    DuplicateCode(String),

    /// Lookup or delete of a missing code
    #[error("SWIFT code: {0} not found.")]
    NotFound(String),

    /// Country listing with no matches
    #[error("No SWIFT codes found for country: {0}")]
    NoCodesFound(String),

    /// One or more shape rules violated
    #[error("{}", validation_message(.context, .violations))]
    Validation {
        context: String,
        violations: Vec<String>,
    },

    /// Bulk feed could not be read as a table
    #[error("Error parsing SWIFT code feed: {0}")]
    ImportParse(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse response category a transport layer maps each error onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Conflict,
    NotFound,
    BadRequest,
    Internal,
}

impl DirectoryError {
    pub fn validation(context: impl Into<String>, violations: Vec<String>) -> Self {
        DirectoryError::Validation {
            context: context.into(),
            violations,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DirectoryError::DuplicateCode(_) => ErrorCategory::Conflict,
            DirectoryError::NotFound(_) | DirectoryError::NoCodesFound(_) => {
                ErrorCategory::NotFound
            }
            DirectoryError::Validation { .. } | DirectoryError::ImportParse(_) => {
                ErrorCategory::BadRequest
            }
            DirectoryError::Store(_) => ErrorCategory::Internal,
        }
    }
}

/// "context: v1 v2", or whichever half is non-empty, or the fallback
fn validation_message(context: &str, violations: &[String]) -> String {
    let joined = violations.join(" ");

    match (context.is_empty(), joined.is_empty()) {
        (true, true) => VALIDATION_FALLBACK_MESSAGE.to_string(),
        (true, false) => joined,
        (false, true) => context.to_string(),
        (false, false) => format!("{}: {}", context, joined),
    }
}
