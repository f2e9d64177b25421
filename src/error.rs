//! Custom error types for ledgerdesk
//!
//! This module defines the error hierarchy for the application using thiserror.
//! Errors coming back from the API are classified into the same enum so that
//! callers can tell a transport failure from a validation failure or a
//! business-rule rejection.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::api::envelope::ApiError;

/// Per-field validation messages, keyed by the wire (camelCase) field name
pub type FieldErrors = BTreeMap<String, String>;

/// The main error type for ledgerdesk operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors (local backend)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network or transport failure; the request never produced an API answer
    #[error("Transport error: {0}")]
    Transport(String),

    /// Validation failure with optional per-field details
    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Business rule rejection (e.g. closing an already-closed period)
    #[error("{message} ({rule})")]
    BusinessRule { rule: String, message: String },

    /// Any other error answered by the API
    #[error("API error {}: {}", .0.code, .0.message)]
    Api(ApiError),

    /// A confirmed action that did not go through; carries the alert text
    #[error("{0}")]
    Refused(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a validation error without field details
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Create a validation error carrying per-field messages
    pub fn invalid_fields(fields: FieldErrors) -> Self {
        Self::Validation {
            message: summarize_fields(&fields),
            fields,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The rule name of a business-rule rejection, if any
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::BusinessRule { rule, .. } => Some(rule),
            _ => None,
        }
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

fn summarize_fields(fields: &FieldErrors) -> String {
    if fields.is_empty() {
        return "invalid input".to_string();
    }
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledgerdesk operations
pub type LedgerResult<T> = Result<T, LedgerError>;
