//! `vitrine categories {list,add,remove}`.

use crate::cli::open_categories;
use crate::cli::output;
use crate::config::Settings;
use anyhow::Result;

pub async fn list(settings: &Settings) -> Result<()> {
    print_categories(&open_categories(settings)?.list()?);
    Ok(())
}

pub async fn add(settings: &Settings, name: &str) -> Result<()> {
    print_categories(&open_categories(settings)?.add(name)?);
    Ok(())
}

pub async fn remove(settings: &Settings, name: &str) -> Result<()> {
    print_categories(&open_categories(settings)?.remove(name)?);
    Ok(())
}

fn print_categories(categories: &[String]) {
    if output::is_json() {
        output::print_json(categories);
        return;
    }
    for c in categories {
        println!("  {c}");
    }
}
