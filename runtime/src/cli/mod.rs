//! CLI subcommand implementations for the Vitrine binary.

pub mod add_cmd;
pub mod categories_cmd;
pub mod feed_cmd;
pub mod import_cmd;
pub mod items_cmd;
pub mod logging;
pub mod manual_cmd;
pub mod output;
pub mod serve_cmd;

use crate::config::Settings;
use anyhow::{Context, Result};
use vitrine_catalog::{CatalogItem, CategoryBook, JsonFileStore};

/// Open the catalog file under the data directory.
pub fn open_store(settings: &Settings) -> Result<JsonFileStore> {
    JsonFileStore::open(settings.db_path())
        .with_context(|| format!("cannot open catalog at {}", settings.db_path().display()))
}

/// Open the category list under the data directory.
pub fn open_categories(settings: &Settings) -> Result<CategoryBook> {
    CategoryBook::open(settings.categories_path()).with_context(|| {
        format!(
            "cannot open categories at {}",
            settings.categories_path().display()
        )
    })
}

/// Print a freshly created item (JSON or a short human summary).
pub fn report_item(item: &CatalogItem) {
    if output::is_json() {
        output::print_json(item);
        return;
    }
    if output::is_quiet() {
        println!("{}", item.id);
        return;
    }
    let s = output::Styled::new();
    println!("  {} {} [{}]", s.ok_sym(), item.title, item.stock_code);
    println!("    id:       {}", item.id);
    println!("    category: {}", item.category);
    println!("    image:    {}", item.image_url);
}
