//! # Invoice Numbering
//!
//! Derives the next invoice number preview and converts between the display
//! form (`INV-0007`) and the bare form sent to the server (`0007`).
//!
//! Preview numbers are cosmetic. Two drafts opened at once can preview the
//! same number; the number the server assigns on save is the only one that
//! counts.

use crate::{INVOICE_NUMBER_PREFIX, INVOICE_NUMBER_WIDTH};

/// `max(parsed) + 1`, or 1 when nothing parses.
///
/// Entries that are not integers (`"bad"`, empty) are skipped. A display
/// prefix is tolerated.
///
/// ```rust
/// use tally_core::numbering::next_invoice_number;
///
/// assert_eq!(next_invoice_number(["3", "1", "7", "bad", "2"]), 8);
/// assert_eq!(next_invoice_number(Vec::<&str>::new()), 1);
/// ```
pub fn next_invoice_number<I, S>(numbers: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    numbers
        .into_iter()
        .filter_map(|n| parse_invoice_number(n.as_ref()))
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Parses `"7"`, `"0007"` or `"INV-0007"` into 7.
pub fn parse_invoice_number(raw: &str) -> Option<u64> {
    strip_display_prefix(raw.trim()).parse().ok()
}

/// `7` → `"INV-0007"`.
pub fn format_invoice_number(number: u64) -> String {
    format!(
        "{}{}",
        INVOICE_NUMBER_PREFIX,
        bare_invoice_number(number)
    )
}

/// `7` → `"0007"`, the form sent in `invoiceNo`.
pub fn bare_invoice_number(number: u64) -> String {
    format!("{:0width$}", number, width = INVOICE_NUMBER_WIDTH)
}

/// `"INV-0007"` → `"0007"`. Strings without the prefix come back unchanged.
pub fn strip_display_prefix(display: &str) -> &str {
    display
        .strip_prefix(INVOICE_NUMBER_PREFIX)
        .unwrap_or(display)
}
