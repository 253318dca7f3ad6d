//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error taxonomy used throughout Audex. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation failures carry field-level detail, never a bare string.
//! - Duplicate-key storage faults are translated into `DuplicateField`
//!   with the offending field and value before they leave the store.
//! - Lifecycle violations name the attempted transition.
//! - Managers only wrap errors they can add context to; recoverable and
//!   fatal classes are distinguishable by variant, and no write is retried
//!   automatically on behalf of the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field that failed validation (dotted path for nested fields).
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulator for field-level validation failures.
///
/// Entity validation walks every rule and collects all failures rather
/// than stopping at the first, so callers see the complete picture in a
/// single rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// All collected field errors.
    pub field_errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether any failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// Convert into a `Result`, erroring if any failure was recorded.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.field_errors.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

/// An illegal lifecycle transition, naming the attempted move.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid {entity} transition: {from} -> {to}")]
pub struct StateTransitionError {
    /// The entity kind whose lifecycle was violated.
    pub entity: String,
    /// The persisted state at validation time.
    pub from: String,
    /// The attempted target state.
    pub to: String,
}

impl StateTransitionError {
    /// Build a transition error from state display values.
    pub fn new(
        entity: impl Into<String>,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self {
            entity: entity.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Top-level error type for the Audex platform.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Schema or business-rule rejection with field-level detail.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Unique-constraint violation.
    #[error("duplicate value for {field}: {value:?}")]
    DuplicateField {
        /// The unique field that collided.
        field: String,
        /// The colliding value.
        value: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind.
        entity: String,
        /// The identifier that resolved to nothing.
        id: String,
    },

    /// Illegal status or stage move.
    #[error(transparent)]
    StateTransition(#[from] StateTransitionError),

    /// Underlying store failure. Not recoverable by resubmission.
    #[error("storage error: {0}")]
    Storage(String),

    /// Missing or invalid startup configuration. Fatal to initialization.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    /// A validation error for a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(field, message);
        Self::Validation(errors)
    }

    /// A validation error for a malformed identifier.
    pub fn malformed_id(entity: &str, value: &str) -> Self {
        Self::invalid_field(
            format!("{entity}_id"),
            format!("malformed {entity} identifier: {value:?}"),
        )
    }

    /// A not-found error for an entity/id pair.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// A duplicate-field error.
    pub fn duplicate(field: &str, value: impl std::fmt::Display) -> Self {
        Self::DuplicateField {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether the caller can recover by resubmitting corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::DuplicateField { .. }
                | Self::NotFound { .. }
                | Self::StateTransition(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.push("email", "not a valid email address");
        errors.push("org_domains", "at most 10 domains allowed");
        assert_eq!(errors.field_errors.len(), 2);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_transition_error_message() {
        let err = StateTransitionError::new("engagement", "active", "pending");
        assert_eq!(
            err.to_string(),
            "invalid engagement transition: active -> pending"
        );
    }

    #[test]
    fn test_recoverable_classes() {
        assert!(DomainError::duplicate("email", "a@b.co").is_recoverable());
        assert!(DomainError::not_found("user", "u1").is_recoverable());
        assert!(!DomainError::Storage("connection reset".into()).is_recoverable());
        assert!(!DomainError::Configuration("missing AUDEX_ADDR".into()).is_recoverable());
    }

    #[test]
    fn test_duplicate_display() {
        let err = DomainError::duplicate("org_domains", "acme.com");
        assert_eq!(err.to_string(), "duplicate value for org_domains: \"acme.com\"");
    }
}
