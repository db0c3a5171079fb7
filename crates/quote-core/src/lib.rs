//! # quote-core: Pure Pricing Logic for Quotations
//!
//! This crate is the **heart** of the quotation back-office. It contains the
//! line-item discount/tax/total engine as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quotation Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end (admin forms)                      │   │
//! │  │    Create ──► Edit ──► View ──► Print                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    quote-desk (draft + commands)                │   │
//! │  │    add_line, update_line, remove_line, submit_quotation         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quote-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   line    │  │ document  │  │ validation│  │   │
//! │  │   │   Money   │  │ calculate │  │ aggregate │  │   rules   │  │   │
//! │  │   │  rounding │  │   _line   │  │ breakdown │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, LineTotals, Quotation, etc.)
//! - [`money`] - Decimal money type and the single rounding rule
//! - [`line`] - Line Total Calculator
//! - [`document`] - Document Aggregator
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: No floating point; amounts round once, to 2 places
//! 4. **Explicit Errors**: Invalid input is rejected, never clamped
//!
//! ## Example Usage
//!
//! ```rust
//! use quote_core::{aggregate, LineItem, Money, TaxRate};
//! use rust_decimal::Decimal;
//!
//! let items = vec![
//!     LineItem::new("SKU-1", Decimal::TWO, Money::from_cents(10000))
//!         .with_discount_percentage(Decimal::TEN)
//!         .with_tax("VAT", TaxRate::from_percentage(Decimal::from(5))),
//!     LineItem::new("SKU-2", Decimal::ONE, Money::from_cents(10000))
//!         .with_tax("VAT", TaxRate::from_percentage(Decimal::from(5)))
//!         .with_tax("Levy", TaxRate::from_percentage(Decimal::from(3))),
//! ];
//!
//! let totals = aggregate(&items).unwrap();
//! assert_eq!(totals.subtotal, Money::from_cents(30000));
//! assert_eq!(totals.discount_amount, Money::from_cents(2000));
//! assert_eq!(totals.tax_amount, Money::from_cents(1700));
//! assert_eq!(totals.total, Money::from_cents(29700));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod line;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{aggregate, breakdown, prepare_submission};
pub use error::{CoreError, CoreResult, ValidationError};
pub use line::{calculate_line, calculate_lines};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for single-tenant deployments.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Minor-unit digits every emitted amount is rounded to.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Maximum length of short names (tax names, quotation numbers).
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length of a quotation title.
pub const MAX_TITLE_LENGTH: usize = 200;
