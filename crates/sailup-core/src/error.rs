//! # Error Types
//!
//! Domain-specific error types for sailup-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sailup-core errors (this file)                                        │
//! │  ├── CoreError          - Business rule violations                     │
//! │  ├── ValidationError    - A single field failure                       │
//! │  └── ValidationFailures - Every field failure of one submission        │
//! │                                                                         │
//! │  sailup-db errors (separate crate)                                     │
//! │  └── DbError            - Store failures, wraps CoreError via Domain   │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationFailures → CoreError → DbError      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, product code, status)
//! 3. Errors are enum variants, never bare Strings
//! 4. Validation failures are COLLECTED, not short-circuited, so the caller
//!    can present the full correction list in one round trip

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are terminal for the
/// request that raised them: retrying the same input will fail the same way.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (or is no longer active).
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The requested window overlaps an existing non-cancelled booking.
    ///
    /// ## When This Occurs
    /// - Another booking for the same product holds an interval with
    ///   `existing.start < end AND existing.end > start`
    #[error("product {product_id} is not available in the requested period")]
    BookingConflict { product_id: String },

    /// Booking status change not allowed by the transition table.
    ///
    /// ## When This Occurs
    /// - Cancelled → Confirmed (cancellation is terminal)
    /// - Confirmed → Pending
    #[error("booking cannot move from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The product requires a nautical licence the user has not recorded.
    #[error("product {product_id} requires a nautical licence")]
    LicenseRequired { product_id: String },

    /// Translation references a language code that does not exist.
    #[error("language not found: {0}")]
    LanguageNotFound(String),

    /// Registration with an email that is already registered.
    #[error("email already registered")]
    EmailAlreadyRegistered,

    /// Registration with a fiscal code that is already registered.
    #[error("fiscal code already registered")]
    FiscalCodeAlreadyRegistered,

    /// Input validation failed; carries every failing field.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailures),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field validation failure.
///
/// Produced by the validators in [`crate::validation`]; collected into a
/// [`ValidationFailures`] list when a whole form is checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Invalid format (bad charset, failed checksum, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    /// Name of the field this failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Every validation failure of one submission.
///
/// All fields are checked independently; the list preserves field order so
/// callers can render a complete correction list rather than one error at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailures(pub Vec<ValidationError>);

impl std::error::Error for ValidationFailures {}

impl ValidationFailures {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::BookingConflict {
            product_id: "BARCA-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "product BARCA-01 is not available in the requested period"
        );

        let err = CoreError::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        };
        assert_eq!(
            err.to_string(),
            "booking cannot move from Cancelled to Confirmed"
        );
    }

    #[test]
    fn test_validation_failures_display_joins_all_fields() {
        let failures = ValidationFailures(vec![
            ValidationError::Required { field: "email" },
            ValidationError::TooShort {
                field: "password",
                min: 8,
            },
        ]);
        assert_eq!(
            failures.to_string(),
            "email is required; password must be at least 8 characters"
        );
    }

    #[test]
    fn test_validation_failures_convert_to_core_error() {
        let failures = ValidationFailures(vec![ValidationError::Required { field: "name" }]);
        let core_err: CoreError = failures.into();
        assert!(matches!(core_err, CoreError::Validation(f) if f.len() == 1));
    }
}
