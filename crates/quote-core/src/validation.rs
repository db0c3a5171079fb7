//! # Validation Module
//!
//! Input validation for quotation lines and headers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end form                                               │
//! │  ├── Clamps / masks input while the user types                         │
//! │  └── Immediate field feedback                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Rejects out-of-range numbers (never clamps)                       │
//! │  └── Called by the line calculator before any arithmetic               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence API                                              │
//! │  └── Stores exactly what the core computed                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quote_core::validation::{validate_quantity, validate_discount_percentage};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(Decimal::TWO).is_ok());
//! assert!(validate_discount_percentage(Decimal::from(150)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, TaxEntry};
use crate::{CURRENCY_DECIMAL_PLACES, MAX_NAME_LENGTH, MAX_TITLE_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be zero or greater
/// - Zero is allowed: a freshly added row starts at zero
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use quote_core::money::Money;
/// use quote_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());      // Free item
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unitPrice".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_discount_percentage(pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discountPercentage".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        });
    }

    Ok(())
}

/// Validates an absolute discount against the unrounded line base.
///
/// ## Rules
/// - Must be zero or greater
/// - Must not exceed `quantity × unitPrice`, so the line total never
///   goes negative
pub fn validate_discount_amount(amount: Money, base: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "discountAmount".to_string(),
        });
    }

    if amount > base {
        return Err(ValidationError::ExceedsBase {
            field: "discountAmount".to_string(),
            limit: base.round().amount(),
        });
    }

    Ok(())
}

/// Validates one tax entry.
///
/// ## Rules
/// - Rate must be zero or greater (no upper bound: some levies exceed 100%)
/// - Name must fit the summary column
pub fn validate_tax_entry(entry: &TaxEntry) -> ValidationResult<()> {
    if entry.rate.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "taxRate".to_string(),
        });
    }

    if entry.name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "taxName".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates every raw input of a line item.
///
/// The absolute discount override is checked only when no percentage is
/// present, because the percentage wins in that case and the override is
/// ignored.
///
/// `quantity × unitPrice` must fit at currency precision; anything larger
/// is rejected as `TooLarge` instead of overflowing later.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)?;

    let base = item
        .unit_price
        .checked_multiply_quantity(item.quantity)
        .filter(|raw| fits_currency_precision(*raw))
        .ok_or_else(|| ValidationError::TooLarge {
            field: "lineAmount".to_string(),
        })?;

    match (item.discount_percentage, item.discount_amount) {
        (Some(pct), _) => validate_discount_percentage(pct)?,
        (None, Some(amount)) => validate_discount_amount(amount, base)?,
        (None, None) => {}
    }

    item.tax_entries.iter().try_for_each(validate_tax_entry)
}

/// Checks that an amount still has room for two decimal places once rounded.
///
/// `Decimal` holds 28 significant digits; past that, rounding to cents
/// silently keeps fewer places.
pub fn fits_currency_precision(amount: Money) -> bool {
    amount.round().amount().scale() == CURRENCY_DECIMAL_PLACES
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a quotation title.
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_title;
///
/// assert!(validate_title("Website redesign").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LENGTH,
        });
    }

    Ok(())
}

/// Validates a quotation number such as `QT-2024-0042`.
///
/// ## Rules
/// - Must not be empty
/// - Letters, digits, hyphens, slashes and underscores only
pub fn validate_quotation_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "quotationNumber".to_string(),
        });
    }

    if number.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "quotationNumber".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    if !number
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "quotationNumber".to_string(),
            reason: "must contain only letters, numbers, hyphens, slashes, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity id.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a UUID (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`)
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec!(0)).is_ok());
        assert!(validate_quantity(dec!(1.5)).is_ok());
        assert!(validate_quantity(dec!(-0.0)).is_ok());

        assert!(validate_quantity(dec!(-1)).is_err());
        assert!(validate_quantity(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_discount_percentage() {
        assert!(validate_discount_percentage(dec!(0)).is_ok());
        assert!(validate_discount_percentage(dec!(12.5)).is_ok());
        assert!(validate_discount_percentage(dec!(100)).is_ok());

        assert!(validate_discount_percentage(dec!(-0.1)).is_err());
        assert!(validate_discount_percentage(dec!(100.01)).is_err());
    }

    #[test]
    fn test_validate_discount_amount() {
        let base = Money::from_cents(20000);
        assert!(validate_discount_amount(Money::from_cents(2000), base).is_ok());
        assert!(validate_discount_amount(base, base).is_ok());

        assert_eq!(
            validate_discount_amount(Money::from_cents(20001), base),
            Err(ValidationError::ExceedsBase {
                field: "discountAmount".to_string(),
                limit: dec!(200.00),
            })
        );
        assert!(validate_discount_amount(Money::from_cents(-1), base).is_err());
    }

    #[test]
    fn test_validate_tax_entry() {
        assert!(validate_tax_entry(&TaxEntry::new("VAT", TaxRate::from_percentage(dec!(20)))).is_ok());
        assert!(validate_tax_entry(&TaxEntry::new("Levy", TaxRate::from_percentage(dec!(150)))).is_ok());
        assert!(validate_tax_entry(&TaxEntry::new("VAT", TaxRate::from_percentage(dec!(-5)))).is_err());
        assert!(validate_tax_entry(&TaxEntry::new("X".repeat(100), TaxRate::zero())).is_err());
    }

    #[test]
    fn test_override_ignored_when_percentage_present() {
        // An oversized override is irrelevant once a percentage is set.
        let item = LineItem::new("P-1", dec!(1), Money::from_cents(1000))
            .with_discount_percentage(dec!(10))
            .with_discount_amount(Money::from_cents(999_999));
        assert!(validate_line_item(&item).is_ok());

        let item = LineItem::new("P-1", dec!(1), Money::from_cents(1000))
            .with_discount_amount(Money::from_cents(999_999));
        assert!(validate_line_item(&item).is_err());
    }

    #[test]
    fn test_line_amount_too_large() {
        let too_large = Err(ValidationError::TooLarge {
            field: "lineAmount".to_string(),
        });

        let quadrillion = dec!(1000000000000000);

        // 10^15 × 10^15 does not fit in a Decimal at all
        let item = LineItem::new("P-1", quadrillion, Money::from_decimal(quadrillion));
        assert_eq!(validate_line_item(&item), too_large);

        // 10^12 × 10^15 fits, but not with two decimal places
        let item = LineItem::new("P-1", dec!(1000000000000), Money::from_decimal(quadrillion));
        assert_eq!(validate_line_item(&item), too_large);

        // The override path multiplies too
        let item = LineItem::new("P-1", quadrillion, Money::from_decimal(quadrillion))
            .with_discount_amount(Money::from_cents(100));
        assert_eq!(validate_line_item(&item), too_large);
    }

    #[test]
    fn test_fits_currency_precision() {
        assert!(fits_currency_precision(Money::zero()));
        assert!(fits_currency_precision(Money::from_decimal(dec!(123456789012345678901234.5678))));
        assert!(!fits_currency_precision(Money::from_decimal(Decimal::MAX)));
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Website redesign").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quotation_number() {
        assert!(validate_quotation_number("QT-2024-0042").is_ok());
        assert!(validate_quotation_number("Q/17").is_ok());
        assert!(validate_quotation_number("").is_err());
        assert!(validate_quotation_number("has space").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(matches!(
            validate_uuid("q-1"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
