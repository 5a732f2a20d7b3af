//! Plain-text rendering of invoices, listings and the item catalog.
//!
//! Renderers return a `String` so they can be tested without a terminal.
//! Amounts shown on a printed invoice are recomputed from the lines rather
//! than copied from the server's totals.

use tally_api::ClientConfig;
use tally_core::calc::line_amount;
use tally_core::listing::Page;
use tally_core::numbering::{bare_invoice_number, format_invoice_number, parse_invoice_number};
use tally_core::{Invoice, InvoiceDraft, InvoiceSummary, Item};

const RULE_WIDTH: usize = 72;
const DESCRIPTION_WIDTH: usize = 28;

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn display_number(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_invoice_number(raw)
            .map(format_invoice_number)
            .unwrap_or_else(|| raw.to_string()),
        None => "-".to_string(),
    }
}

// =============================================================================
// Printable Invoice
// =============================================================================

/// A printable invoice: header, bill-to block, line table, totals, notes.
pub fn render_invoice(invoice: &Invoice, config: &ClientConfig) -> String {
    let config = match invoice.currency_symbol.as_deref().map(str::trim) {
        Some(symbol) if !symbol.is_empty() => ClientConfig {
            currency_symbol: symbol.to_string(),
            ..config.clone()
        },
        _ => config.clone(),
    };
    let money = |m| config.format_currency(m);

    let mut lines = Vec::new();
    let number = invoice
        .invoice_no
        .as_deref()
        .map(|raw| match parse_invoice_number(raw) {
            Some(n) => bare_invoice_number(n),
            None => raw.to_string(),
        })
        .unwrap_or_default();

    lines.push(rule('='));
    lines.push(format!(
        "{:<40}{:>32}",
        invoice.company_name.as_deref().unwrap_or(""),
        "INVOICE"
    ));
    lines.push(format!("{:>72}", format!("#{}", number)));
    lines.push(format!(
        "{:>72}",
        format!("Issue Date: {}", invoice.invoice_date.format("%B %-d, %Y"))
    ));
    lines.push(rule('='));

    lines.push("Bill To:".to_string());
    lines.push(format!("  {}", invoice.customer_name));
    for extra in [&invoice.address, &invoice.city].into_iter().flatten() {
        if !extra.trim().is_empty() {
            lines.push(format!("  {}", extra.trim()));
        }
    }
    lines.push(String::new());

    lines.push(format!(
        "{:<w$}  {:>6}  {:>12}  {:>8}  {:>12}",
        "Description",
        "Qty",
        "Rate",
        "Discount",
        "Amount",
        w = DESCRIPTION_WIDTH
    ));
    lines.push(rule('-'));

    let mut persisted: Vec<_> = invoice.lines.iter().collect();
    persisted.sort_by_key(|line| line.row_no);
    for line in persisted {
        let discount = match line.discount_pct.filter(|d| !d.is_zero()) {
            Some(d) => format!("{}%", d.normalize()),
            None => "-".to_string(),
        };
        let amount = line_amount(line.quantity, line.rate, line.discount_pct);
        lines.push(format!(
            "{:<w$}  {:>6}  {:>12}  {:>8}  {:>12}",
            truncate(&line.description, DESCRIPTION_WIDTH),
            line.quantity.normalize().to_string(),
            config.format_rate(line.rate),
            discount,
            money(amount),
            w = DESCRIPTION_WIDTH
        ));
    }
    lines.push(rule('-'));

    let draft = InvoiceDraft::from_invoice(invoice);
    let totals = draft.totals();
    lines.push(format!("{:>56}{:>16}", "Subtotal", money(totals.sub_total)));
    lines.push(format!(
        "{:>56}{:>16}",
        format!("Tax ({}%)", draft.tax_percentage().normalize()),
        money(totals.tax_amount)
    ));
    lines.push(format!("{:>56}{:>16}", "Total", money(totals.invoice_amount)));

    if let Some(notes) = invoice.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        lines.extend(notes.lines().map(|l| format!("  {}", l)));
    }

    lines.push(rule('='));
    lines.join("\n")
}

// =============================================================================
// Listings
// =============================================================================

pub fn render_invoice_page(page: &Page<InvoiceSummary>, config: &ClientConfig) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<10}  {:<10}  {:<24}  {:>5}  {:>14}",
        "ID", "Number", "Date", "Customer", "Items", "Amount"
    )];
    lines.push(rule('-'));

    for row in &page.rows {
        lines.push(format!(
            "{:>6}  {:<10}  {:<10}  {:<24}  {:>5}  {:>14}",
            row.invoice_id,
            display_number(row.invoice_no.as_deref()),
            row.invoice_date.format("%Y-%m-%d").to_string(),
            truncate(&row.customer_name, 24),
            row.total_items,
            config.format_currency(row.invoice_amount)
        ));
    }

    if page.rows.is_empty() {
        lines.push("No invoices found".to_string());
    }
    lines.push(rule('-'));
    lines.push(page.label());
    lines.join("\n")
}

pub fn render_items(items: &[&Item], config: &ClientConfig) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<30}  {:>12}  {:>8}",
        "ID", "Name", "Rate", "Discount"
    )];
    lines.push(rule('-'));

    for item in items {
        let discount = match item.discount_pct.filter(|d| !d.is_zero()) {
            Some(d) => format!("{}%", d.normalize()),
            None => "-".to_string(),
        };
        lines.push(format!(
            "{:>6}  {:<30}  {:>12}  {:>8}",
            item.item_id,
            truncate(&item.item_name, 30),
            config.format_rate(item.sales_rate),
            discount
        ));
    }

    if items.is_empty() {
        lines.push("No items found".to_string());
    }
    lines.join("\n")
}
