//! `vitrine feed`: write the product feed to stdout.

use crate::cli::open_store;
use crate::config::{resolve_port, Settings};
use crate::feed::render_feed;
use anyhow::Result;
use vitrine_catalog::CatalogStore;

pub async fn run(settings: &Settings, base_url: Option<&str>) -> Result<()> {
    let base_url = base_url
        .map(str::to_string)
        .unwrap_or_else(|| format!("http://localhost:{}", resolve_port(None)));
    let items = open_store(settings)?.list_all()?;
    print!("{}", render_feed(&items, &base_url)?);
    println!();
    Ok(())
}
