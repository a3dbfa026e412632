//! `vitrine add <url>`: resolve one link into the catalog.

use crate::cli::{open_store, report_item};
use crate::config::Settings;
use crate::ingest::{Ingestor, SubmitOutcome};
use anyhow::{bail, Result};

pub async fn run(settings: &Settings, url: &str, category: Option<&str>) -> Result<()> {
    let store = open_store(settings)?;
    let ingestor = Ingestor::from_settings(settings);

    match ingestor.submit(&store, url, category).await? {
        SubmitOutcome::Created(item) => {
            report_item(&item);
            Ok(())
        }
        SubmitOutcome::DuplicateRejected(link) => bail!("already in the catalog: {link}"),
        SubmitOutcome::UnresolvableRejected(link) => bail!("no image found for {link}"),
    }
}
