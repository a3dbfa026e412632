//! `vitrine manual --image <path>`: add an item from a local image.

use crate::cli::{open_store, report_item};
use crate::config::Settings;
use crate::ingest::{Ingestor, ManualForm, ManualUpload};
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(settings: &Settings, image: &Path, form: ManualForm) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("cannot read {}", image.display()))?;

    let upload = ManualUpload {
        original_name: image
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string),
        bytes,
        form,
    };

    let store = open_store(settings)?;
    let item = Ingestor::from_settings(settings)
        .submit_manual(&store, upload)
        .await?;
    report_item(&item);
    Ok(())
}
