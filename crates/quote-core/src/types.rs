//! # Domain Types
//!
//! Core domain types used throughout the quotation workspace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS (edited by the user)          OUTPUTS (derived, never edited)   │
//! │  ┌─────────────────┐                  ┌─────────────────┐               │
//! │  │    LineItem     │ ──calculate──►   │   LineTotals    │               │
//! │  │  ─────────────  │                  │  ─────────────  │               │
//! │  │  product_id     │                  │  base           │               │
//! │  │  quantity       │                  │  discount       │               │
//! │  │  unit_price     │                  │  taxable_base   │               │
//! │  │  discount %/amt │                  │  taxes[]        │               │
//! │  │  tax_entries[]  │                  │  total_amount   │               │
//! │  └─────────────────┘                  └────────┬────────┘               │
//! │                                                │ aggregate             │
//! │  ┌─────────────────┐                  ┌────────▼────────┐               │
//! │  │   Quotation     │                  │ DocumentTotals  │               │
//! │  │  status, items  │ ──submit──►      │ subtotal, tax,  │               │
//! │  │  dates, client  │                  │ discount, total │               │
//! │  └─────────────────┘                  └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! All types serialize with `camelCase` keys. Decimals travel as strings
//! so the web front-end never parses money into a float.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::fits_currency_precision;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate expressed as a percentage (`5` = 5%).
///
/// ## Why Not Basis Points?
/// Tax tables in the back-office are entered as percentages with arbitrary
/// precision (`8.875`), so the rate keeps the decimal as typed.
/// `from_bps` is kept for integrations that store rates as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percentage(pct: Decimal) -> Self {
        TaxRate(pct)
    }

    /// Creates a tax rate from basis points (825 = 8.25%).
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(i64::from(bps), 2))
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percentage(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the rate is below zero (invalid input).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Same rate with trailing zeros stripped, so `5` and `5.00` compare and
    /// print identically in summaries.
    pub fn normalized(&self) -> Self {
        TaxRate(self.0.normalize())
    }
}

// =============================================================================
// Tax Entry
// =============================================================================

/// One named tax applied to a line (e.g. `VAT 20%`, `City levy 1.5%`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxEntry {
    /// Display name of the tax.
    pub name: String,

    /// Rate as a percentage.
    #[ts(type = "string")]
    pub rate: TaxRate,
}

impl TaxEntry {
    /// Creates a tax entry.
    pub fn new(name: impl Into<String>, rate: TaxRate) -> Self {
        TaxEntry {
            name: name.into(),
            rate,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a quotation: a product or service at a quantity and price.
///
/// ## Discount Precedence
/// ```text
/// discount_percentage  discount_amount   → discount used
/// ───────────────────  ───────────────     ──────────────────────────────
/// Some(p)              any                 round(base × p / 100)
/// None                 Some(a)             round(a)  (absolute override)
/// None                 None                0
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Catalog reference. Opaque to the pricing core.
    pub product_id: String,

    /// Free-text row description shown on the quotation.
    #[serde(default)]
    pub description: Option<String>,

    /// Unit count; fractional quantities (hours, kilograms) are allowed.
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Price per unit.
    #[ts(type = "string")]
    pub unit_price: Money,

    /// Discount as a percentage of the line base.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub discount_percentage: Option<Decimal>,

    /// Absolute discount, used only when no percentage is set.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub discount_amount: Option<Money>,

    /// Taxes charged on the discounted base, in display order.
    #[serde(default)]
    pub tax_entries: Vec<TaxEntry>,
}

impl LineItem {
    /// Creates a line without discount or taxes.
    pub fn new(product_id: impl Into<String>, quantity: Decimal, unit_price: Money) -> Self {
        LineItem {
            product_id: product_id.into(),
            quantity,
            unit_price,
            ..LineItem::default()
        }
    }

    /// Sets the percentage discount.
    pub fn with_discount_percentage(mut self, pct: Decimal) -> Self {
        self.discount_percentage = Some(pct);
        self
    }

    /// Sets the absolute discount override.
    pub fn with_discount_amount(mut self, amount: Money) -> Self {
        self.discount_amount = Some(amount);
        self
    }

    /// Appends a tax entry.
    pub fn with_tax(mut self, name: impl Into<String>, rate: TaxRate) -> Self {
        self.tax_entries.push(TaxEntry::new(name, rate));
        self
    }

    /// Sets the row description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Derived Line Output
// =============================================================================

/// One tax entry after it was applied to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedTax {
    pub name: String,
    #[ts(type = "string")]
    pub rate: TaxRate,
    #[ts(type = "string")]
    pub amount: Money,
}

/// Derived amounts for one line. Every amount is rounded to currency
/// precision and `total_amount == taxable_base + tax_amount` holds exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineTotals {
    /// `quantity × unit_price`.
    #[ts(type = "string")]
    pub base: Money,

    #[ts(type = "string")]
    pub discount_amount: Money,

    /// `base − discount_amount`.
    #[ts(type = "string")]
    pub taxable_base: Money,

    /// Per-entry breakdown, same order as the line's `tax_entries`.
    pub taxes: Vec<AppliedTax>,

    /// Sum of `taxes[*].amount`.
    #[ts(type = "string")]
    pub tax_amount: Money,

    #[ts(type = "string")]
    pub total_amount: Money,
}

// =============================================================================
// Document Totals
// =============================================================================

/// Whole-document totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentTotals {
    /// Sum of line bases (pre-discount, pre-tax).
    #[ts(type = "string")]
    pub subtotal: Money,

    #[ts(type = "string")]
    pub discount_amount: Money,

    #[ts(type = "string")]
    pub tax_amount: Money,

    /// `subtotal − discount_amount + tax_amount`.
    #[ts(type = "string")]
    pub total: Money,
}

impl DocumentTotals {
    /// All-zero totals, the state of a brand-new document.
    pub fn zero() -> Self {
        let zero = Money::zero().round();
        DocumentTotals {
            subtotal: zero,
            discount_amount: zero,
            tax_amount: zero,
            total: zero,
        }
    }

    /// Folds already computed line totals.
    ///
    /// Each component is summed independently; `total` is then derived
    /// from the three sums, which equals the sum of line totals because
    /// every line amount is already on currency precision.
    ///
    /// ## Errors
    /// `ValidationError::TooLarge` when a sum no longer fits at currency
    /// precision.
    pub fn from_lines(lines: &[LineTotals]) -> CoreResult<Self> {
        let subtotal = sum_field(lines.iter().map(|l| l.base), "subtotal")?;
        let discount_amount = sum_field(lines.iter().map(|l| l.discount_amount), "discountAmount")?;
        let tax_amount = sum_field(lines.iter().map(|l| l.tax_amount), "taxAmount")?;
        // discounts never exceed their line base
        let total = sum_field([subtotal - discount_amount, tax_amount], "total")?;

        Ok(DocumentTotals {
            subtotal,
            discount_amount,
            tax_amount,
            total,
        })
    }
}

/// Checked, rounded sum of one document column.
pub(crate) fn sum_field<I>(amounts: I, field: &str) -> CoreResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    Money::checked_sum(amounts)
        .filter(|sum| fits_currency_precision(*sum))
        .map(|sum| sum.round())
        .ok_or_else(|| {
            CoreError::Validation(ValidationError::TooLarge {
                field: field.to_string(),
            })
        })
}

impl Default for DocumentTotals {
    fn default() -> Self {
        DocumentTotals::zero()
    }
}

/// Tax collected per `(name, rate)` across a document, as printed in the
/// totals box of a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxSummary {
    pub name: String,
    #[ts(type = "string")]
    pub rate: TaxRate,
    /// Sum of the taxable bases this tax was charged on.
    #[ts(type = "string")]
    pub taxable_base: Money,
    #[ts(type = "string")]
    pub tax_amount: Money,
}

/// Per-line output, document totals and tax summary from one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentBreakdown {
    /// Same order as the input items.
    pub lines: Vec<LineTotals>,
    pub totals: DocumentTotals,
    /// Sorted by tax name, then rate.
    pub tax_summary: Vec<TaxSummary>,
}

// =============================================================================
// Quotation Status
// =============================================================================

/// Lifecycle of a quotation.
///
/// ## Transitions
/// ```text
///            send               accept
///   Draft ──────────► Sent ──────────────► Accepted
///     ▲                │
///     └─── recall ─────┤        reject
///                      └─────────────────► Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Being edited; the only state that accepts line changes.
    #[default]
    Draft,
    /// Sent to the client, awaiting an answer.
    Sent,
    /// Client accepted the offer.
    Accepted,
    /// Client declined the offer.
    Rejected,
}

impl QuotationStatus {
    /// Checks whether `self → next` is an allowed move.
    pub fn can_transition_to(self, next: QuotationStatus) -> bool {
        use QuotationStatus::*;
        matches!(
            (self, next),
            (Draft, Sent) | (Sent, Accepted) | (Sent, Rejected) | (Sent, Draft)
        )
    }

    /// Returns `next` if the move is allowed.
    pub fn transition_to(self, next: QuotationStatus) -> CoreResult<QuotationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Only drafts accept line edits.
    #[inline]
    pub fn is_editable(self) -> bool {
        self == QuotationStatus::Draft
    }

    /// Accepted and rejected quotations never change again.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, QuotationStatus::Accepted | QuotationStatus::Rejected)
    }
}

// =============================================================================
// Quotation
// =============================================================================

/// A quotation document as exchanged with the persistence API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quotation {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this quotation belongs to.
    pub tenant_id: String,

    /// Human-readable number, e.g. `QT-2024-0042`.
    pub quotation_number: String,

    /// CRM client reference, opaque here.
    #[serde(default)]
    pub client_id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub status: QuotationStatus,

    #[ts(as = "String")]
    pub issued_on: NaiveDate,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expires_on: Option<NaiveDate>,

    pub items: Vec<LineItem>,

    #[serde(default)]
    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The payload handed to the persistence API on submit.
///
/// ## Single Source of Truth
/// View, print and PDF layers render from this payload and never
/// recompute. The numbers here are exactly what the core produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuotationSubmission {
    pub quotation: Quotation,
    /// Derived amounts per line, same order as `quotation.items`.
    pub lines: Vec<LineTotals>,
    pub totals: DocumentTotals,
    pub tax_summary: Vec<TaxSummary>,
    #[ts(as = "String")]
    pub submitted_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.percentage(), dec!(8.25));
    }

    #[test]
    fn test_tax_rate_normalized() {
        let a = TaxRate::from_percentage(dec!(5.00)).normalized();
        let b = TaxRate::from_percentage(dec!(5)).normalized();
        assert_eq!(a.percentage().to_string(), b.percentage().to_string());
    }

    #[test]
    fn test_line_item_deserializes_with_defaults() {
        let json = r#"{ "productId": "SKU-1", "quantity": "2", "unitPrice": "100.00" }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, Money::from_cents(10000));
        assert!(item.discount_percentage.is_none());
        assert!(item.discount_amount.is_none());
        assert!(item.tax_entries.is_empty());
    }

    #[test]
    fn test_line_item_builder() {
        let item = LineItem::new("SKU-1", dec!(1), Money::from_cents(500))
            .with_description("Setup fee")
            .with_discount_percentage(dec!(10))
            .with_tax("VAT", TaxRate::from_percentage(dec!(20)));

        assert_eq!(item.description.as_deref(), Some("Setup fee"));
        assert_eq!(item.tax_entries.len(), 1);
        assert_eq!(item.tax_entries[0].name, "VAT");
    }

    fn line_totals(base: Money, tax: Money) -> LineTotals {
        LineTotals {
            base,
            discount_amount: Money::zero().round(),
            taxable_base: base,
            taxes: Vec::new(),
            tax_amount: tax,
            total_amount: base + tax,
        }
    }

    #[test]
    fn test_document_totals_from_lines() {
        let lines = [
            line_totals(Money::from_cents(20000), Money::from_cents(900)),
            line_totals(Money::from_cents(10000), Money::from_cents(800)),
        ];

        let totals = DocumentTotals::from_lines(&lines).unwrap();
        assert_eq!(totals.subtotal, Money::from_cents(30000));
        assert_eq!(totals.tax_amount, Money::from_cents(1700));
        assert_eq!(totals.total, Money::from_cents(31700));
        assert_eq!(DocumentTotals::from_lines(&[]).unwrap(), DocumentTotals::zero());
    }

    #[test]
    fn test_document_totals_overflow_is_an_error() {
        // Each line fits at currency precision; their sum does not.
        let big = Money::from_decimal(dec!(500000000000000000000000000.00));
        let lines = [line_totals(big, Money::zero()), line_totals(big, Money::zero())];

        assert_eq!(
            DocumentTotals::from_lines(&lines),
            Err(CoreError::Validation(ValidationError::TooLarge {
                field: "subtotal".to_string()
            }))
        );
    }

    #[test]
    fn test_status_default() {
        assert_eq!(QuotationStatus::default(), QuotationStatus::Draft);
    }

    #[test]
    fn test_status_transitions() {
        use QuotationStatus::*;

        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Rejected));
        assert!(Sent.can_transition_to(Draft));

        assert!(!Draft.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Draft));
        assert!(!Rejected.can_transition_to(Sent));
        assert!(!Draft.can_transition_to(Draft));

        assert_eq!(Draft.transition_to(Sent), Ok(Sent));
        assert_eq!(
            Accepted.transition_to(Sent),
            Err(CoreError::InvalidStatusTransition {
                from: Accepted,
                to: Sent
            })
        );
    }

    #[test]
    fn test_status_flags() {
        assert!(QuotationStatus::Draft.is_editable());
        assert!(!QuotationStatus::Sent.is_editable());
        assert!(QuotationStatus::Accepted.is_terminal());
        assert!(!QuotationStatus::Sent.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&QuotationStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }

    #[test]
    fn test_zero_totals_serialize_with_two_places() {
        let json = serde_json::to_value(DocumentTotals::zero()).unwrap();
        assert_eq!(json["subtotal"], "0.00");
        assert_eq!(json["total"], "0.00");
    }
}
