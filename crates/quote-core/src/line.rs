//! # Line Total Calculator
//!
//! Turns one line item's raw inputs into its derived amounts.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Calculation                                     │
//! │                                                                         │
//! │  validate_line_item ── any violation ──► InvalidLineItem (no clamping) │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  raw_base  = quantity × unit_price            (full precision)         │
//! │  base      = round(raw_base)                                           │
//! │  discount  = round(raw_base × pct / 100)      or round(override)       │
//! │  taxable   = base − discount                                           │
//! │  tax[i]    = round(taxable × rate[i] / 100)   each off the SAME base  │
//! │  tax       = Σ tax[i]                         summed, never compounded │
//! │  total     = taxable + tax                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Sum Instead of Compound?
//! With taxes [5%, 3%] on $100.00 the line pays $8.00, not
//! $100 × 1.05 × 1.03 − $100 = $8.15. Every screen that shows a quotation
//! (edit, view, print) relies on this rule, so it lives in exactly one place.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AppliedTax, LineItem, LineTotals};
use crate::validation::{fits_currency_precision, validate_line_item};

/// Calculates the derived amounts of a single line.
///
/// ## Errors
/// Returns `CoreError::InvalidLineItem` (with `line: None`) when any input
/// is out of range, or when an amount would not fit at currency precision
/// (`ValidationError::TooLarge`).
///
/// ## Example
/// ```rust
/// use quote_core::line::calculate_line;
/// use quote_core::{LineItem, Money, TaxRate};
/// use rust_decimal::Decimal;
///
/// let item = LineItem::new("SKU-1", Decimal::TWO, Money::from_cents(10000))
///     .with_discount_percentage(Decimal::TEN)
///     .with_tax("VAT", TaxRate::from_percentage(Decimal::from(5)));
///
/// let totals = calculate_line(&item).unwrap();
/// assert_eq!(totals.base, Money::from_cents(20000));
/// assert_eq!(totals.discount_amount, Money::from_cents(2000));
/// assert_eq!(totals.tax_amount, Money::from_cents(900));
/// assert_eq!(totals.total_amount, Money::from_cents(18900));
/// ```
pub fn calculate_line(item: &LineItem) -> CoreResult<LineTotals> {
    validate_line_item(item).map_err(CoreError::invalid_line)?;

    let raw_base = item
        .unit_price
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(|| too_large("lineAmount"))?;
    let base = rounded(Some(raw_base), "lineAmount")?;
    let discount_amount = discount_for(item, raw_base)?;
    // discount never exceeds base, both non-negative
    let taxable_base = base - discount_amount;

    let taxes = item
        .tax_entries
        .iter()
        .map(|entry| {
            Ok(AppliedTax {
                name: entry.name.clone(),
                rate: entry.rate,
                amount: rounded(
                    taxable_base.checked_percentage_of(entry.rate.percentage()),
                    "taxAmount",
                )?,
            })
        })
        .collect::<CoreResult<Vec<AppliedTax>>>()?;
    let tax_amount = rounded(Money::checked_sum(taxes.iter().map(|t| t.amount)), "taxAmount")?;
    let total_amount = rounded(taxable_base.checked_add(tax_amount), "totalAmount")?;

    Ok(LineTotals {
        base,
        discount_amount,
        taxable_base,
        taxes,
        tax_amount,
        total_amount,
    })
}

/// Calculates every line, tagging a failure with its 0-based position.
///
/// Stops at the first invalid line: a document with one bad row has no
/// valid totals.
pub fn calculate_lines(items: &[LineItem]) -> CoreResult<Vec<LineTotals>> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| calculate_line(item).map_err(|e| e.at_line(position)))
        .collect()
}

/// Rounded discount for a validated line.
///
/// The percentage is authoritative when present; the absolute override only
/// applies without one.
fn discount_for(item: &LineItem, raw_base: Money) -> CoreResult<Money> {
    match (item.discount_percentage, item.discount_amount) {
        (Some(pct), _) => rounded(raw_base.checked_percentage_of(pct), "discountAmount"),
        (None, Some(amount)) => rounded(Some(amount), "discountAmount"),
        (None, None) => Ok(Money::zero().round()),
    }
}

/// Rounds a checked result, rejecting overflow and values too wide for cents.
fn rounded(amount: Option<Money>, field: &str) -> CoreResult<Money> {
    amount
        .filter(|m| fits_currency_precision(*m))
        .map(|m| m.round())
        .ok_or_else(|| too_large(field))
}

fn too_large(field: &str) -> CoreError {
    CoreError::invalid_line(ValidationError::TooLarge {
        field: field.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;
    use rust_decimal_macros::dec;

    fn rate(pct: rust_decimal::Decimal) -> TaxRate {
        TaxRate::from_percentage(pct)
    }

    #[test]
    fn test_single_line_with_discount_and_tax() {
        let item = LineItem::new("SKU-1", dec!(2), Money::from_cents(10000))
            .with_discount_percentage(dec!(10))
            .with_tax("VAT", rate(dec!(5)));

        let totals = calculate_line(&item).unwrap();

        assert_eq!(totals.base.amount(), dec!(200.00));
        assert_eq!(totals.discount_amount.amount(), dec!(20.00));
        assert_eq!(totals.taxable_base.amount(), dec!(180.00));
        assert_eq!(totals.tax_amount.amount(), dec!(9.00));
        assert_eq!(totals.total_amount.amount(), dec!(189.00));
    }

    #[test]
    fn test_multiple_taxes_are_summed_not_compounded() {
        let item = LineItem::new("SKU-2", dec!(1), Money::from_cents(10000))
            .with_tax("VAT", rate(dec!(5)))
            .with_tax("Levy", rate(dec!(3)));

        let totals = calculate_line(&item).unwrap();

        assert_eq!(totals.tax_amount.amount(), dec!(8.00));
        assert_eq!(totals.total_amount.amount(), dec!(108.00));
        assert_ne!(totals.total_amount.amount(), dec!(108.15));

        assert_eq!(totals.taxes.len(), 2);
        assert_eq!(totals.taxes[0].name, "VAT");
        assert_eq!(totals.taxes[0].amount, Money::from_cents(500));
        assert_eq!(totals.taxes[1].name, "Levy");
        assert_eq!(totals.taxes[1].amount, Money::from_cents(300));
    }

    #[test]
    fn test_no_discount_no_tax() {
        let item = LineItem::new("SKU-3", dec!(3), Money::from_cents(299));
        let totals = calculate_line(&item).unwrap();

        assert_eq!(totals.base, Money::from_cents(897));
        assert!(totals.discount_amount.is_zero());
        assert!(totals.tax_amount.is_zero());
        assert!(totals.taxes.is_empty());
        assert_eq!(totals.total_amount, Money::from_cents(897));
    }

    #[test]
    fn test_default_zero_line() {
        let totals = calculate_line(&LineItem::default()).unwrap();
        assert!(totals.total_amount.is_zero());
        assert_eq!(totals.total_amount.amount().to_string(), "0.00");
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let item = LineItem::new("SKU-1", dec!(-1), Money::from_cents(10000));

        assert_eq!(
            calculate_line(&item),
            Err(CoreError::InvalidLineItem {
                line: None,
                reason: ValidationError::MustBeNonNegative {
                    field: "quantity".to_string()
                },
            })
        );
    }

    #[test]
    fn test_other_invalid_inputs_are_rejected() {
        let negative_price = LineItem::new("A", dec!(1), Money::from_cents(-1));
        let big_discount =
            LineItem::new("A", dec!(1), Money::from_cents(100)).with_discount_percentage(dec!(101));
        let negative_discount =
            LineItem::new("A", dec!(1), Money::from_cents(100)).with_discount_percentage(dec!(-1));
        let negative_tax =
            LineItem::new("A", dec!(1), Money::from_cents(100)).with_tax("VAT", rate(dec!(-5)));
        let oversized_override =
            LineItem::new("A", dec!(1), Money::from_cents(100)).with_discount_amount(Money::from_cents(101));

        for item in [negative_price, big_discount, negative_discount, negative_tax, oversized_override] {
            assert!(
                matches!(calculate_line(&item), Err(CoreError::InvalidLineItem { line: None, .. })),
                "expected rejection for {:?}",
                item
            );
        }
    }

    #[test]
    fn test_full_discount_gives_zero_total() {
        let item = LineItem::new("A", dec!(4), Money::from_cents(2500))
            .with_discount_percentage(dec!(100))
            .with_tax("VAT", rate(dec!(20)));

        let totals = calculate_line(&item).unwrap();
        assert_eq!(totals.discount_amount, Money::from_cents(10000));
        assert!(totals.total_amount.is_zero());
    }

    #[test]
    fn test_absolute_discount_override() {
        let item = LineItem::new("A", dec!(2), Money::from_cents(5000))
            .with_discount_amount(Money::from_cents(1500))
            .with_tax("VAT", rate(dec!(10)));

        let totals = calculate_line(&item).unwrap();
        assert_eq!(totals.discount_amount, Money::from_cents(1500));
        assert_eq!(totals.taxable_base, Money::from_cents(8500));
        assert_eq!(totals.tax_amount, Money::from_cents(850));
        assert_eq!(totals.total_amount, Money::from_cents(9350));
    }

    #[test]
    fn test_percentage_wins_over_absolute_override() {
        let item = LineItem::new("A", dec!(1), Money::from_cents(10000))
            .with_discount_percentage(dec!(10))
            .with_discount_amount(Money::from_cents(5000));

        let totals = calculate_line(&item).unwrap();
        assert_eq!(totals.discount_amount, Money::from_cents(1000));
    }

    #[test]
    fn test_fractional_quantity_rounds_once() {
        // 1.5 × 3.33 = 4.995 → base 5.00; 10% of 4.995 = 0.4995 → 0.50
        let item = LineItem::new("A", dec!(1.5), Money::from_cents(333))
            .with_discount_percentage(dec!(10))
            .with_tax("VAT", rate(dec!(8.25)));

        let totals = calculate_line(&item).unwrap();
        assert_eq!(totals.base.amount(), dec!(5.00));
        assert_eq!(totals.discount_amount.amount(), dec!(0.50));
        assert_eq!(totals.taxable_base.amount(), dec!(4.50));
        // 4.50 × 8.25% = 0.37125 → 0.37
        assert_eq!(totals.tax_amount.amount(), dec!(0.37));
        assert_eq!(totals.total_amount.amount(), dec!(4.87));
    }

    #[test]
    fn test_line_invariant_holds_on_emitted_values() {
        let item = LineItem::new("A", dec!(7), Money::from_cents(1333))
            .with_discount_percentage(dec!(12.5))
            .with_tax("VAT", rate(dec!(19)))
            .with_tax("Eco", rate(dec!(0.7)));

        let t = calculate_line(&item).unwrap();
        assert_eq!(t.total_amount, t.base - t.discount_amount + t.tax_amount);
        assert_eq!(t.tax_amount, t.taxes.iter().map(|x| x.amount).sum::<Money>());
        for amount in [t.base, t.discount_amount, t.taxable_base, t.tax_amount, t.total_amount] {
            assert_eq!(amount.amount().scale(), 2);
        }
    }

    #[test]
    fn test_huge_tax_rate_is_rejected_not_panicking() {
        let item = LineItem::new("A", dec!(1), Money::from_cents(100000))
            .with_tax("VAT", rate(rust_decimal::Decimal::MAX));

        assert_eq!(
            calculate_line(&item),
            Err(CoreError::InvalidLineItem {
                line: None,
                reason: ValidationError::TooLarge {
                    field: "taxAmount".to_string()
                },
            })
        );
    }

    #[test]
    fn test_huge_quantity_times_price_is_rejected() {
        let quadrillion = dec!(1000000000000000);
        let item = LineItem::new("A", quadrillion, Money::from_decimal(quadrillion))
            .with_tax("VAT", rate(dec!(5)));

        assert_eq!(
            calculate_line(&item),
            Err(CoreError::InvalidLineItem {
                line: None,
                reason: ValidationError::TooLarge {
                    field: "lineAmount".to_string()
                },
            })
        );
    }

    #[test]
    fn test_tax_sum_overflow_is_rejected() {
        // Each entry fits on its own; together they do not.
        let item = LineItem::new("A", dec!(1), Money::from_decimal(dec!(100000000000000000000)))
            .with_tax("A", rate(dec!(500000000)))
            .with_tax("B", rate(dec!(500000000)));

        assert!(matches!(
            calculate_line(&item),
            Err(CoreError::InvalidLineItem {
                line: None,
                reason: ValidationError::TooLarge { .. },
            })
        ));
    }

    #[test]
    fn test_large_but_representable_line() {
        let item = LineItem::new("A", dec!(1000000), Money::from_decimal(dec!(1000000000000)))
            .with_tax("VAT", rate(dec!(20)));

        let totals = calculate_line(&item).unwrap();
        assert_eq!(totals.total_amount.amount(), dec!(1200000000000000000.00));
        assert_eq!(totals.total_amount.amount().scale(), 2);
    }

    #[test]
    fn test_calculate_lines_tags_position() {
        let items = vec![
            LineItem::new("A", dec!(1), Money::from_cents(100)),
            LineItem::new("B", dec!(1), Money::from_cents(100)),
            LineItem::new("C", dec!(-2), Money::from_cents(100)),
        ];

        let err = calculate_lines(&items).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineItem { line: Some(2), .. }));
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let item = LineItem::new("A", dec!(3.3), Money::from_cents(1999))
            .with_discount_percentage(dec!(7.5))
            .with_tax("VAT", rate(dec!(21)));

        assert_eq!(calculate_line(&item), calculate_line(&item));
    }
}
