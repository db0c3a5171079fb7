//! # Text Rendering
//!
//! Plain-text totals box for terminals.
//!
//! ```text
//! #   Product        Qty      Base  Discount       Tax     Total
//! 1   SKU-1            2   $200.00    $20.00     $9.00   $189.00
//! 2   SKU-2            1   $100.00     $0.00     $8.00   $108.00
//! ----------------------------------------------------------------
//! Subtotal                                               $300.00
//! Discount                                                $20.00
//! Levy 3%                                                  $3.00
//! VAT 5%                                                  $14.00
//! Tax                                                     $17.00
//! TOTAL (USD)                                            $297.00
//! ```
//!
//! Only formats what the core computed; nothing is recalculated here.

use std::fmt::Write;

use quote_core::{DocumentBreakdown, LineItem, Money};

use crate::state::ConfigState;

const RULE_WIDTH: usize = 64;

/// Renders a breakdown next to the rows it was computed from.
pub fn render_text(items: &[LineItem], breakdown: &DocumentBreakdown, config: &ConfigState) -> String {
    let sym = config.currency_symbol.as_str();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<3} {:<12} {:>6} {:>9} {:>9} {:>9} {:>9}",
        "#", "Product", "Qty", "Base", "Discount", "Tax", "Total"
    );
    for (position, (item, line)) in items.iter().zip(&breakdown.lines).enumerate() {
        let _ = writeln!(
            out,
            "{:<3} {:<12} {:>6} {:>9} {:>9} {:>9} {:>9}",
            position + 1,
            truncate(&item.product_id, 12),
            item.quantity.normalize().to_string(),
            money(sym, line.base),
            money(sym, line.discount_amount),
            money(sym, line.tax_amount),
            money(sym, line.total_amount),
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    let totals = &breakdown.totals;
    summary_row(&mut out, "Subtotal", &money(sym, totals.subtotal));
    summary_row(&mut out, "Discount", &money(sym, totals.discount_amount));
    for tax in &breakdown.tax_summary {
        let label = format!("{} {}%", tax.name, tax.rate.percentage().normalize());
        summary_row(&mut out, &label, &money(sym, tax.tax_amount));
    }
    summary_row(&mut out, "Tax", &money(sym, totals.tax_amount));
    summary_row(
        &mut out,
        &format!("TOTAL ({})", config.currency_code),
        &money(sym, totals.total),
    );

    out
}

fn summary_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{:<width$}{:>12}", label, value, width = RULE_WIDTH - 12);
}

fn money(symbol: &str, amount: Money) -> String {
    let value = amount.round().amount();
    if value.is_sign_negative() && !value.is_zero() {
        format!("-{}{}", symbol, value.abs())
    } else {
        format!("{}{}", symbol, value)
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
