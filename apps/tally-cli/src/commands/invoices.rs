//! Invoice commands: list, show, create, edit, delete.

use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use tally_api::{ApiClient, DraftEditor, InvoiceBackend};
use tally_core::listing::{paginate, total_revenue, DateRange, InvoiceFilter, InvoiceQuery};
use tally_core::numbering::format_invoice_number;
use tally_core::{Catalog, CoreError, InvoiceId, ItemId, LineField};
use tracing::debug;

use super::Context;
use crate::render::{render_invoice, render_invoice_page};
use crate::ui;

// =============================================================================
// Line Argument
// =============================================================================

/// `ITEM:QTY[:RATE[:DISCOUNT]]`, where ITEM is an item id or exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub item: String,
    pub quantity: String,
    pub rate: Option<String>,
    pub discount: Option<String>,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let non_empty = |i: usize| {
            parts
                .get(i)
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
        };

        match parts.len() {
            2..=4 if !parts[0].is_empty() && !parts[1].is_empty() => Ok(LineArg {
                item: parts[0].to_string(),
                quantity: parts[1].to_string(),
                rate: non_empty(2),
                discount: non_empty(3),
            }),
            _ => Err(format!(
                "'{}' is not ITEM:QTY[:RATE[:DISCOUNT]]",
                s
            )),
        }
    }
}

impl LineArg {
    /// Resolves the item by id first, then by exact name.
    pub fn resolve_item(&self, catalog: &Catalog) -> Result<ItemId, CoreError> {
        if let Ok(id) = self.item.parse::<ItemId>() {
            return Ok(id);
        }
        catalog
            .find_by_name(&self.item)
            .map(|item| item.item_id)
            .ok_or_else(|| CoreError::Validation(tally_core::ValidationError::InvalidFormat {
                field: "item".to_string(),
                reason: format!("no item named '{}'", self.item),
            }))
    }
}

// =============================================================================
// Draft Arguments
// =============================================================================

#[derive(Debug, Default, Args)]
pub struct DraftArgs {
    /// Customer name
    #[arg(long)]
    pub customer: Option<String>,

    /// Invoice date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Tax percentage (0-100)
    #[arg(long)]
    pub tax: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Line as ITEM:QTY[:RATE[:DISCOUNT]]; repeatable
    #[arg(long = "line", value_name = "LINE")]
    pub lines: Vec<LineArg>,
}

fn apply_draft_args<B: InvoiceBackend>(
    editor: &mut DraftEditor<B>,
    args: &DraftArgs,
) -> Result<()> {
    if let Some(customer) = &args.customer {
        editor.set_customer_name(customer)?;
    }
    if let Some(date) = args.date {
        editor.set_invoice_date(date)?;
    }
    if let Some(tax) = &args.tax {
        editor.set_tax_percentage_text(tax)?;
    }
    if let Some(address) = &args.address {
        editor.set_address(address)?;
    }
    if let Some(city) = &args.city {
        editor.set_city(city)?;
    }
    if let Some(notes) = &args.notes {
        editor.set_notes(notes)?;
    }

    for line in &args.lines {
        let item_id = line.resolve_item(editor.catalog())?;
        let row = target_row(editor)?;
        editor.select_item(row, item_id)?;
        editor.edit_field_text(row, LineField::Quantity, &line.quantity)?;
        if let Some(rate) = &line.rate {
            editor.edit_field_text(row, LineField::Rate, rate)?;
        }
        if let Some(discount) = &line.discount {
            editor.edit_field_text(row, LineField::DiscountPct, discount)?;
        }
        debug!(row, item_id, "Line applied");
    }
    Ok(())
}

/// Reuses a trailing untouched row, otherwise appends one.
fn target_row<B: InvoiceBackend>(editor: &mut DraftEditor<B>) -> Result<usize> {
    let (len, reusable) = match editor.draft() {
        Some(draft) => (
            draft.lines().len(),
            draft
                .lines()
                .last()
                .is_some_and(|last| !last.has_item() && !last.has_content()),
        ),
        None => (0, false),
    };

    if reusable {
        Ok(len - 1)
    } else {
        editor.add_row()?;
        Ok(len)
    }
}

async fn save_and_report(ctx: &Context, mut editor: DraftEditor<ApiClient>) -> Result<()> {
    let (number, totals) = match editor.draft() {
        Some(draft) => (draft.number().display(), draft.totals()),
        None => bail!("No draft is open"),
    };

    let outcome = editor.save().await?;

    for row in outcome.dropped.iter().filter(|r| r.has_content) {
        ui::warning(&format!(
            "Row {} ('{}') has no item and was not saved",
            row.row + 1,
            row.description
        ));
    }

    let number = outcome
        .invoice
        .as_ref()
        .and_then(|i| i.invoice_no.as_deref())
        .and_then(tally_core::numbering::parse_invoice_number)
        .map(format_invoice_number)
        .unwrap_or(number);
    ui::success(&format!("Saved invoice {}", number));
    ui::key_value("Subtotal", &ctx.config.format_currency(totals.sub_total));
    ui::key_value("Tax", &ctx.config.format_currency(totals.tax_amount));
    ui::key_value("Total", &ctx.config.format_currency(totals.invoice_amount));
    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

/// Options for `invoices list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// today, week, month, year, or FROM..TO
    #[arg(long)]
    pub range: Option<DateRange>,

    /// Match invoice number or customer name
    #[arg(long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 5, 10 or 25
    #[arg(
        long,
        default_value_t = tally_core::listing::DEFAULT_PAGE_SIZE,
        value_parser = parse_page_size
    )]
    pub per_page: usize,
}

pub fn parse_page_size(s: &str) -> Result<usize, String> {
    let size: usize = s.trim().parse().map_err(|_| format!("'{}' is not a number", s))?;
    if tally_core::listing::PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "page size must be one of {:?}",
            tally_core::listing::PAGE_SIZES
        ))
    }
}

pub async fn list(ctx: &Context, args: &ListArgs) -> Result<()> {
    let today = Local::now().date_naive();
    let filter = match args.range {
        Some(range) => InvoiceFilter::from_range(range, today),
        None => InvoiceFilter::default(),
    };

    let rows = ctx.client.list_invoices(&filter).await?;
    let query = InvoiceQuery {
        search: args.search.clone().unwrap_or_default(),
        range: args.range,
    };
    let matched = query.apply(&rows, today);
    let page = paginate(&matched, args.page.saturating_sub(1), args.per_page);

    println!("{}", render_invoice_page(&page, &ctx.config));
    ui::key_value("Revenue", &ctx.config.format_currency(total_revenue(&matched)));
    Ok(())
}

pub async fn show(ctx: &Context, id: InvoiceId) -> Result<()> {
    let invoice = ctx.client.get_invoice(id).await?;
    println!("{}", render_invoice(&invoice, &ctx.config));
    Ok(())
}

pub async fn next_number(ctx: &Context) -> Result<()> {
    let next = ctx.client.next_invoice_number().await?;
    println!("{}", format_invoice_number(next));
    Ok(())
}

pub async fn create(ctx: &Context, args: &DraftArgs) -> Result<()> {
    let mut editor =
        DraftEditor::new(ctx.client.clone()).with_default_tax(ctx.config.default_tax_percentage);
    editor.open_new(Local::now().date_naive()).await?;
    apply_draft_args(&mut editor, args)?;
    save_and_report(ctx, editor).await
}

/// Rows in `remove_rows` are 1-based and refer to the invoice as loaded.
pub async fn edit(
    ctx: &Context,
    id: InvoiceId,
    remove_rows: &[usize],
    args: &DraftArgs,
) -> Result<()> {
    let mut editor = DraftEditor::new(ctx.client.clone());
    editor.open_existing(id).await?;

    let mut rows: Vec<usize> = remove_rows.to_vec();
    rows.sort_unstable();
    rows.dedup();
    for row in rows.into_iter().rev() {
        if row == 0 {
            bail!("Row numbers start at 1");
        }
        editor.remove_row(row - 1)?;
    }

    apply_draft_args(&mut editor, args)?;
    save_and_report(ctx, editor).await
}

pub async fn delete(ctx: &Context, id: InvoiceId) -> Result<()> {
    ctx.client.delete_invoice(id).await?;
    ui::success(&format!("Deleted invoice {}", id));
    Ok(())
}
