//! Domain-specific error types and the field-attached error collection.
//!
//! Confirmation outcomes are modeled as recoverable, field-attached errors
//! collected on the record (see [`FieldErrors`]); operations return
//! `Ok(false)` when they fail this way. The [`DomainError`] enum is
//! reserved for collaborator failures (storage, internal faults), which
//! propagate through `Result` as usual.

use chrono::Duration;
use thiserror::Error;

/// Recoverable confirmation failures attached to individual record fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("was already confirmed, please try signing in")]
    AlreadyConfirmed,

    #[error("needs to be confirmed within {}, please request a new one", humanize_window(.window))]
    TokenExpired { window: Duration },

    #[error("not found")]
    NotFound,

    #[error("has already been taken")]
    Taken,

    #[error("can't be blank")]
    Required,
}

/// Core domain errors for collaborator and system failures
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// A single error attached to a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub error: ConfirmationError,
}

/// Ordered collection of field-attached errors carried by a record
///
/// Lookup operations return a uniform record object even on failure; the
/// caller inspects this collection instead of matching on an error type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    /// Attach an error to a field
    pub fn add(&mut self, field: impl Into<String>, error: ConfirmationError) {
        self.entries.push(FieldError {
            field: field.into(),
            error,
        });
    }

    /// Remove all attached errors
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First error attached to the given field, if any
    pub fn on(&self, field: &str) -> Option<&ConfirmationError> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {}", e.field, e.error))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// Render a validity window for user-facing messages
fn humanize_window(window: &Duration) -> String {
    let secs = window.num_seconds();
    if secs > 0 && secs % 86400 == 0 {
        let days = secs / 86400;
        if days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", days)
        }
    } else if secs > 0 && secs % 3600 == 0 {
        format!("{} hours", secs / 3600)
    } else {
        format!("{} seconds", secs)
    }
}
