//! `vitrine import <csv>`: batch-import the links of a spreadsheet export.

use crate::cli::open_store;
use crate::cli::output::{self, Styled};
use crate::config::Settings;
use crate::ingest::{links_from_csv, Ingestor};
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(settings: &Settings, csv_path: &Path, category: Option<&str>) -> Result<()> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("cannot open {}", csv_path.display()))?;
    let links = links_from_csv(file)
        .with_context(|| format!("cannot read CSV {}", csv_path.display()))?;

    let store = open_store(settings)?;
    let ingestor = Ingestor::from_settings(settings);

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  Importing {} links...", links.len());
    }
    let report = ingestor.import_batch(&store, &links, category).await?;

    if output::is_json() {
        output::print_json(&report);
        return Ok(());
    }
    if output::is_quiet() {
        println!("{}", report.accepted_count);
        return Ok(());
    }

    let s = Styled::new();
    println!("  {} Processed {}", s.ok_sym(), report.accepted_count);
    for item in &report.accepted_items {
        println!("    + {} {}", item.stock_code, item.original_url);
    }
    let skipped = report.duplicate_count + report.unresolvable_count;
    if skipped > 0 {
        println!(
            "  {} skipped {skipped} ({} duplicate, {} without image)",
            s.warn_sym(),
            report.duplicate_count,
            report.unresolvable_count
        );
    }
    Ok(())
}
