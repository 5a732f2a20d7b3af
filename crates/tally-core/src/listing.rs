//! # Invoice Listing
//!
//! Filtering, ordering and paging of invoice summaries for the dashboard.
//!
//! ```text
//! GET /Invoice/GetList ──► InvoiceQuery::apply ──► paginate ──► Page
//!        ▲                 (search, range,          (5/10/25 rows)
//!        │                  date desc)
//! InvoiceFilter::from_range
//! (fromDate / toDate)
//! ```

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::ValidationError;
use crate::money::Money;
use crate::numbering::format_invoice_number;
use crate::numbering::parse_invoice_number;
use crate::types::{InvoiceId, InvoiceSummary};

/// Page sizes offered by the listing.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// Rows per page when none is chosen.
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

// =============================================================================
// Date Range
// =============================================================================

/// A date window relative to "today". Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    /// The last seven days, today included.
    Week,
    /// From the first of the current month.
    Month,
    /// From the first of January.
    Year,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl DateRange {
    /// Inclusive `(from, to)` bounds. A reversed custom range is swapped.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            DateRange::Today => (today, today),
            DateRange::Week => (today - Duration::days(6), today),
            DateRange::Month => (today.with_day(1).unwrap_or(today), today),
            DateRange::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
            DateRange::Custom { from, to } if from > to => (to, from),
            DateRange::Custom { from, to } => (from, to),
        }
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        let (from, to) = self.bounds(today);
        from <= date && date <= to
    }
}

impl FromStr for DateRange {
    type Err = ValidationError;

    /// `today`, `week`, `month`, `year`, or `YYYY-MM-DD..YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "today" => return Ok(DateRange::Today),
            "week" => return Ok(DateRange::Week),
            "month" => return Ok(DateRange::Month),
            "year" => return Ok(DateRange::Year),
            _ => {}
        }

        let invalid = || ValidationError::InvalidFormat {
            field: "range".to_string(),
            reason: format!(
                "'{}' is not today, week, month, year or FROM..TO",
                s
            ),
        };

        let (from, to) = s.split_once("..").ok_or_else(invalid)?;
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(DateRange::Custom { from, to })
    }
}

// =============================================================================
// Server Filter
// =============================================================================

/// Query parameters for `GET /Invoice/GetList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub invoice_id: Option<InvoiceId>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl InvoiceFilter {
    pub fn from_range(range: DateRange, today: NaiveDate) -> Self {
        let (from, to) = range.bounds(today);
        InvoiceFilter {
            invoice_id: None,
            from_date: Some(from),
            to_date: Some(to),
        }
    }

    /// `(name, value)` pairs; unset fields are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.invoice_id.filter(|id| *id > 0) {
            pairs.push(("InvoiceID", id.to_string()));
        }
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

// =============================================================================
// Local Query
// =============================================================================

/// Client-side search and date filter over loaded summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    pub search: String,
    pub range: Option<DateRange>,
}

impl InvoiceQuery {
    /// Case-insensitive substring match on invoice number or customer name.
    pub fn matches(&self, row: &InvoiceSummary, today: NaiveDate) -> bool {
        if let Some(range) = self.range {
            if !range.contains(today, row.invoice_date) {
                return false;
            }
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let raw_no = row.invoice_no.as_deref().unwrap_or("").to_lowercase();
        let display_no = row
            .invoice_no
            .as_deref()
            .and_then(parse_invoice_number)
            .map(|n| format_invoice_number(n).to_lowercase())
            .unwrap_or_default();

        raw_no.contains(&term)
            || display_no.contains(&term)
            || row.customer_name.to_lowercase().contains(&term)
    }

    /// Filters and sorts newest first. Ties keep server order.
    pub fn apply(&self, rows: &[InvoiceSummary], today: NaiveDate) -> Vec<InvoiceSummary> {
        let mut out: Vec<InvoiceSummary> = rows
            .iter()
            .filter(|row| self.matches(row, today))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.invoice_date.cmp(&a.invoice_date));
        out
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of rows. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub page_count: usize,
}

impl<T> Page<T> {
    /// `"6–10 of 12"`, or `"0–0 of 0"` when empty.
    pub fn label(&self) -> String {
        if self.total == 0 {
            return "0–0 of 0".to_string();
        }
        let first = self.page * self.per_page + 1;
        let last = first + self.rows.len() - 1;
        format!("{}–{} of {}", first, last, self.total)
    }
}

/// Slices `rows` into a page. A page past the end is clamped to the last
/// page; `per_page == 0` falls back to the default size.
pub fn paginate<T: Clone>(rows: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PAGE_SIZE } else { per_page };
    let total = rows.len();
    let page_count = total.div_ceil(per_page);
    let page = page.min(page_count.saturating_sub(1));

    let start = page * per_page;
    let end = (start + per_page).min(total);

    Page {
        rows: rows.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        per_page,
        total,
        page_count,
    }
}

/// Sum of `invoiceAmount` across rows.
pub fn total_revenue(rows: &[InvoiceSummary]) -> Money {
    rows.iter().map(|row| row.invoice_amount).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
