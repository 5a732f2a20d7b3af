//! # Line-Item Calculator
//!
//! Pure amount and total arithmetic for invoices.
//!
//! ## Formulae
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  amount        = round2(quantity × rate × (1 − discountPct/100))        │
//! │  subTotal      = Σ amount   (lines with a selected item only)           │
//! │  taxAmount     = round2(subTotal × taxPercentage/100)                   │
//! │  invoiceAmount = subTotal + taxAmount                                   │
//! │                                                                         │
//! │  round2 = half away from zero at 2 decimal places                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals never read a line's cached `amount`; every call recomputes from
//! quantity, rate and discount, so a stale cache cannot leak into a total.
//! Everything here is O(lines) and safe to call on every keystroke.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::LineItem;
use crate::money::Money;

/// Amount for one line from raw numbers, as typed into a form.
///
/// Returns zero when `quantity` or `rate` (or a given discount) is not a
/// finite number or cannot be represented as a decimal. Never fails.
///
/// ```rust
/// use tally_core::calc::compute_line_amount;
///
/// assert_eq!(compute_line_amount(3.0, 10.0, Some(10.0)).cents(), 2700);
/// assert_eq!(compute_line_amount(f64::NAN, 10.0, None).cents(), 0);
/// ```
pub fn compute_line_amount(quantity: f64, rate: f64, discount_pct: Option<f64>) -> Money {
    let discount = discount_pct.unwrap_or(0.0);
    if !quantity.is_finite() || !rate.is_finite() || !discount.is_finite() {
        return Money::zero();
    }

    let (Some(qty), Some(rate), Some(discount)) = (
        Decimal::from_f64(quantity),
        Decimal::from_f64(rate),
        Decimal::from_f64(discount),
    ) else {
        return Money::zero();
    };

    discounted_amount(qty, rate, discount).unwrap_or_default()
}

/// Amount for one line from typed values.
///
/// The rate is used at full precision; rounding happens once, on the
/// discounted product. An absent discount counts as 0%. Overflow yields zero.
pub fn line_amount(quantity: Decimal, rate: Decimal, discount_pct: Option<Decimal>) -> Money {
    discounted_amount(quantity, rate, discount_pct.unwrap_or(Decimal::ZERO)).unwrap_or_default()
}

fn discounted_amount(quantity: Decimal, rate: Decimal, discount_pct: Decimal) -> Option<Money> {
    let factor = Decimal::ONE.checked_sub(discount_pct.checked_div(Decimal::ONE_HUNDRED)?)?;
    let exact = quantity.checked_mul(rate)?.checked_mul(factor)?;
    Some(Money::from_decimal(exact))
}

/// Derived totals of a draft. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    #[ts(type = "number")]
    pub sub_total: Money,
    #[ts(type = "number")]
    pub tax_amount: Money,
    #[ts(type = "number")]
    pub invoice_amount: Money,
}

/// Totals over the lines that have an item selected.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::calc::compute_totals;
///
/// let totals = compute_totals(&[], Decimal::TEN);
/// assert!(totals.invoice_amount.is_zero());
/// ```
pub fn compute_totals(lines: &[LineItem], tax_percentage: Decimal) -> InvoiceTotals {
    let sub_total: Money = lines
        .iter()
        .filter(|line| line.has_item())
        .map(|line| line_amount(line.quantity, line.rate, line.discount_pct))
        .sum();

    let tax_amount = sub_total.percentage(tax_percentage);

    InvoiceTotals {
        sub_total,
        tax_amount,
        invoice_amount: sub_total + tax_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
