//! # Error Types
//!
//! Domain-specific error types for quote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quote-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing and lifecycle failures                 │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  quote-desk errors (app crate)                                         │
//! │  ├── ConfigError      - Bad QUOTE_* environment values                 │
//! │  └── ApiError         - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front-end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, line position, status)
//! 3. Errors are enum variants, never String
//! 4. The core never formats user-facing copy; the presentation layer
//!    maps `field` to its own form labels

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::QuotationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing and lifecycle errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A line item's raw inputs violate the pricing constraints.
    ///
    /// ## When This Occurs
    /// - Negative quantity or unit price
    /// - Discount percentage outside 0..=100
    /// - Negative tax rate
    /// - Absolute discount larger than the line base
    ///
    /// `line` is the 0-based row position when the failure came from a
    /// document, `None` when a single line was priced on its own.
    ///
    /// ## User Workflow
    /// ```text
    /// Edit row 3: quantity = -1
    ///      │
    ///      ▼
    /// aggregate(items)
    ///      │
    ///      ▼
    /// InvalidLineItem { line: Some(2), reason: MustBeNonNegative("quantity") }
    ///      │
    ///      ▼
    /// UI highlights row 3, submit button disabled
    /// ```
    #[error("Invalid line item{}: {reason}", line_suffix(.line))]
    InvalidLineItem {
        line: Option<usize>,
        reason: ValidationError,
    },

    /// A quotation status change that the lifecycle does not allow.
    #[error("Cannot move quotation from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: QuotationStatus,
        to: QuotationStatus,
    },

    /// Line edits were attempted on a quotation that is no longer a draft.
    #[error("Quotation is {status:?} and can no longer be edited")]
    NotEditable { status: QuotationStatus },

    /// An edit addressed a row that does not exist.
    #[error("Line {line} does not exist")]
    LineNotFound { line: usize },

    /// Validation error outside of line pricing (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Tags an `InvalidLineItem` with the row it came from.
    ///
    /// Other variants pass through unchanged.
    pub fn at_line(self, position: usize) -> Self {
        match self {
            CoreError::InvalidLineItem { reason, .. } => CoreError::InvalidLineItem {
                line: Some(position),
                reason,
            },
            other => other,
        }
    }

    /// Builds an untagged `InvalidLineItem`.
    pub fn invalid_line(reason: ValidationError) -> Self {
        CoreError::InvalidLineItem { line: None, reason }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(position) => format!(" #{}", position + 1),
        None => String::new(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., stray characters in a quotation number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An absolute discount larger than the amount it applies to.
    #[error("{field} cannot exceed the line amount {limit}")]
    ExceedsBase { field: String, limit: Decimal },

    /// An amount that no longer fits in a decimal at currency precision.
    #[error("{field} is too large to calculate")]
    TooLarge { field: String },
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
    fn test_invalid_line_item_messages() {
        let err = CoreError::invalid_line(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid line item: quantity must not be negative");

        let tagged = err.at_line(2);
        assert_eq!(
            tagged.to_string(),
            "Invalid line item #3: quantity must not be negative"
        );
    }

    #[test]
    fn test_at_line_leaves_other_variants_alone() {
        let err = CoreError::LineNotFound { line: 7 };
        assert_eq!(err.clone().at_line(1), err);
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "discountPercentage".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        };
        assert_eq!(err.to_string(), "discountPercentage must be between 0 and 100");

        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn test_status_error_message() {
        let err = CoreError::InvalidStatusTransition {
            from: QuotationStatus::Accepted,
            to: QuotationStatus::Draft,
        };
        assert_eq!(err.to_string(), "Cannot move quotation from Accepted to Draft");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quotationNumber".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
