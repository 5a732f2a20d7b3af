//! Item catalog commands.

use anyhow::Result;
use rust_decimal::Decimal;
use tally_core::validation::{parse_optional_percentage, parse_rate};
use tally_core::{Catalog, ItemId, ItemPayload};

use super::Context;
use crate::render::render_items;
use crate::ui;

pub async fn list(ctx: &Context, search: Option<&str>) -> Result<()> {
    let catalog = Catalog::new(ctx.client.list_items().await?);
    let items = match search {
        Some(term) => catalog.search(term),
        None => catalog.items().iter().collect(),
    };

    println!("{}", render_items(&items, &ctx.config));
    Ok(())
}

pub async fn show(ctx: &Context, id: ItemId) -> Result<()> {
    let item = ctx.client.get_item(id).await?;

    ui::header(&item.item_name);
    ui::key_value("ID", &item.item_id.to_string());
    ui::key_value("Rate", &ctx.config.format_rate(item.sales_rate));
    if let Some(discount) = item.discount_pct.filter(|d| !d.is_zero()) {
        ui::key_value("Discount", &format!("{}%", discount.normalize()));
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        ui::key_value("Description", description);
    }
    Ok(())
}

/// Text fields for an item, as typed on the command line.
#[derive(Debug, Default)]
pub struct ItemFields<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub rate: Option<&'a str>,
    pub discount: Option<&'a str>,
}

fn parse_discount(input: Option<&str>) -> Result<Option<Option<Decimal>>> {
    Ok(match input {
        Some(text) => Some(parse_optional_percentage("discountPct", text)?),
        None => None,
    })
}

pub async fn add(ctx: &Context, fields: ItemFields<'_>) -> Result<()> {
    let rate = parse_rate(fields.rate.unwrap_or("0"))?;
    let discount = parse_discount(fields.discount)?.flatten();
    let payload = ItemPayload::new(
        None,
        fields.name.unwrap_or_default(),
        fields.description,
        rate,
        discount,
    )?;

    let item = ctx.client.save_item(&payload).await?;
    ui::success(&format!("Created item {} ({})", item.item_name, item.item_id));
    Ok(())
}

/// Loads the item, overlays the given fields, and sends the full body.
pub async fn update(ctx: &Context, id: ItemId, fields: ItemFields<'_>) -> Result<()> {
    let current = ctx.client.get_item(id).await?;

    let rate = match fields.rate {
        Some(text) => parse_rate(text)?,
        None => current.sales_rate,
    };
    let discount = parse_discount(fields.discount)?.unwrap_or(current.discount_pct);
    let payload = ItemPayload::new(
        Some(id),
        fields.name.unwrap_or(&current.item_name),
        fields.description.or(current.description.as_deref()),
        rate,
        discount,
    )?;

    let item = ctx.client.save_item(&payload).await?;
    ui::success(&format!("Updated item {} ({})", item.item_name, item.item_id));
    Ok(())
}

pub async fn delete(ctx: &Context, id: ItemId) -> Result<()> {
    ctx.client.delete_item(id).await?;
    ui::success(&format!("Deleted item {}", id));
    Ok(())
}
