//! # Document Aggregator
//!
//! Recomputes whole-quotation totals from the current list of lines.
//!
//! ## Recompute Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Edit = Full Recompute                          │
//! │                                                                         │
//! │  Presentation layer                     quote-core                      │
//! │  ──────────────────                     ──────────                      │
//! │  user edits row 2 ──► items snapshot ──► aggregate(&items)              │
//! │                                              │                          │
//! │                                              ├─► calculate_line × n     │
//! │                                              └─► fold 4 sums            │
//! │  render totals ◄──────────────────────── DocumentTotals                 │
//! │                                                                         │
//! │  No cached or incremental state. Tens of rows recompute in well         │
//! │  under a millisecond, so correctness wins over cleverness.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - **Empty is valid**: `aggregate(&[])` is all zeros
//! - **Order-independent**: permuting items never changes totals or the
//!   tax summary
//! - **Idempotent**: same items, bit-identical output
//! - **Fail-fast**: one invalid line fails the document, tagged with its row

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::line::calculate_lines;
use crate::money::Money;
use crate::types::{
    sum_field, DocumentBreakdown, DocumentTotals, LineItem, LineTotals, Quotation,
    QuotationSubmission, TaxRate, TaxSummary,
};
use crate::validation::{validate_quotation_number, validate_title, validate_uuid};

/// Computes document totals.
///
/// ## Example
/// ```rust
/// use quote_core::document::aggregate;
/// use quote_core::{DocumentTotals, LineItem, Money};
/// use rust_decimal::Decimal;
///
/// assert_eq!(aggregate(&[]).unwrap(), DocumentTotals::zero());
///
/// let items = vec![LineItem::new("SKU-1", Decimal::ONE, Money::from_cents(1000))];
/// assert_eq!(aggregate(&items).unwrap().total, Money::from_cents(1000));
/// ```
pub fn aggregate(items: &[LineItem]) -> CoreResult<DocumentTotals> {
    let lines = calculate_lines(items)?;
    DocumentTotals::from_lines(&lines)
}

/// Computes per-line totals, document totals and the tax summary together.
pub fn breakdown(items: &[LineItem]) -> CoreResult<DocumentBreakdown> {
    let lines = calculate_lines(items)?;
    let totals = DocumentTotals::from_lines(&lines)?;
    let tax_summary = summarize_taxes(&lines)?;

    Ok(DocumentBreakdown {
        lines,
        totals,
        tax_summary,
    })
}

/// Groups applied taxes by `(name, normalized rate)`.
///
/// Keys are ordered, so the summary does not depend on line order.
pub fn summarize_taxes(lines: &[LineTotals]) -> CoreResult<Vec<TaxSummary>> {
    let mut groups: BTreeMap<(String, TaxRate), (Vec<Money>, Vec<Money>)> = BTreeMap::new();

    for line in lines {
        for tax in &line.taxes {
            let key = (tax.name.trim().to_string(), tax.rate.normalized());
            let entry = groups.entry(key).or_default();
            entry.0.push(line.taxable_base);
            entry.1.push(tax.amount);
        }
    }

    groups
        .into_iter()
        .map(|((name, rate), (taxable_bases, tax_amounts))| {
            Ok(TaxSummary {
                name,
                rate,
                taxable_base: sum_field(taxable_bases, "taxableBase")?,
                tax_amount: sum_field(tax_amounts, "taxAmount")?,
            })
        })
        .collect()
}

/// Validates a quotation header, prices its items and builds the payload
/// for the persistence API.
///
/// `submitted_at` is passed in so the core never reads a clock.
pub fn prepare_submission(
    quotation: Quotation,
    submitted_at: DateTime<Utc>,
) -> CoreResult<QuotationSubmission> {
    validate_uuid(&quotation.id)?;
    validate_quotation_number(&quotation.quotation_number)?;
    validate_title(&quotation.title)?;

    let DocumentBreakdown {
        lines,
        totals,
        tax_summary,
    } = breakdown(&quotation.items)?;

    Ok(QuotationSubmission {
        quotation,
        lines,
        totals,
        tax_summary,
        submitted_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
