//! `vitrine list` and `vitrine remove <id>`.

use crate::cli::open_store;
use crate::cli::output::{self, truncate, Styled};
use crate::config::Settings;
use crate::ingest::Ingestor;
use anyhow::Result;
use vitrine_catalog::{remove_item, CatalogStore};

/// Print the catalog, newest first.
pub async fn list(settings: &Settings) -> Result<()> {
    let items = open_store(settings)?.list_all()?;

    if output::is_json() {
        output::print_json(&items);
        return Ok(());
    }
    if items.is_empty() {
        if !output::is_quiet() {
            println!("  Catalog is empty.");
        }
        return Ok(());
    }

    let s = Styled::new();
    for item in &items {
        let marker = if item.is_feed_eligible() {
            s.ok_sym()
        } else {
            " "
        };
        println!(
            "  {marker} {:<10} {} {:<14} {:<32} {}",
            item.stock_code,
            item.created_at.format("%Y-%m-%d"),
            truncate(&item.category, 14),
            truncate(&item.title, 32),
            s.dim(&item.id)
        );
    }
    if !output::is_quiet() {
        let in_feed = items.iter().filter(|i| i.is_feed_eligible()).count();
        println!("\n  {} items, {in_feed} in feed", items.len());
    }
    Ok(())
}

/// Delete an item and its managed image.
pub async fn remove(settings: &Settings, id: &str) -> Result<()> {
    let store = open_store(settings)?;
    let item = remove_item(&store, id)?;
    Ingestor::from_settings(settings)
        .materializer()
        .reclaim(&item)
        .await;

    if output::is_json() {
        output::print_json(&serde_json::json!({ "success": true, "id": item.id }));
    } else if !output::is_quiet() {
        println!("  {} Removed {} [{}]", Styled::new().ok_sym(), item.title, item.stock_code);
    }
    Ok(())
}
