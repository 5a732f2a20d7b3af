//! Item category commands.

use anyhow::Result;

use super::Context;
use crate::ui;

pub async fn list(ctx: &Context) -> Result<()> {
    let categories = ctx.client.list_categories().await?;
    if categories.is_empty() {
        ui::info("No categories");
        return Ok(());
    }

    for category in &categories {
        println!("{:>6}  {}", category.category_id, category.category_name);
    }
    Ok(())
}

pub async fn add(ctx: &Context, name: &str) -> Result<()> {
    let category = ctx.client.create_category(name).await?;
    ui::success(&format!(
        "Created category {} ({})",
        category.category_name, category.category_id
    ));
    Ok(())
}

pub async fn rename(ctx: &Context, id: i64, name: &str) -> Result<()> {
    let category = ctx.client.update_category(id, name).await?;
    ui::success(&format!("Renamed category {} to {}", id, category.category_name));
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64) -> Result<()> {
    ctx.client.delete_category(id).await?;
    ui::success(&format!("Deleted category {}", id));
    Ok(())
}
