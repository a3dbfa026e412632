// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Turn resolved links and manual uploads into catalog items.
//!
//! Link images are copied into managed storage under a generated name. If
//! the copy fails the item keeps pointing at the remote image, so ingestion
//! still succeeds.

use super::IngestError;
use crate::acquisition::fetcher::AssetFetcher;
use crate::resolve::Resolved;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;
use vitrine_catalog::{
    category_or_default, parse_quantity, CatalogItem, ItemDetails, MANAGED_PREFIX,
    MANUAL_TITLE, MANUAL_UPLOAD_SENTINEL,
};

/// Extension used when none can be inferred.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Commerce fields typed into the manual entry form.
#[derive(Debug, Clone, Default)]
pub struct ManualForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub mold_price: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub quantity: Option<String>,
    pub description: Option<String>,
}

/// An image uploaded by hand together with its form.
#[derive(Debug, Clone, Default)]
pub struct ManualUpload {
    /// File name the client sent, used for its extension.
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
    pub form: ManualForm,
}

/// Builds catalog items and owns the managed image directory.
pub struct Materializer {
    fetcher: Arc<dyn AssetFetcher>,
    uploads_dir: PathBuf,
}

impl Materializer {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Build the item for a resolved link. Never fails.
    pub async fn materialize(&self, resolved: &Resolved, link: &str, category: &str) -> CatalogItem {
        let file_name = managed_file_name(extension_of(&resolved.image_locator));
        let destination = self.uploads_dir.join(&file_name);

        let image_url = match self.fetcher.fetch(&resolved.image_locator, &destination).await {
            Ok(_) => format!("{MANAGED_PREFIX}{file_name}"),
            Err(failure) => {
                tracing::warn!(link, "keeping remote image: {failure}");
                resolved.image_locator.clone()
            }
        };

        CatalogItem::create(
            link,
            image_url,
            resolved.title.clone(),
            category,
            ItemDetails::default(),
        )
    }

    /// Store a hand-uploaded image and build its item.
    pub async fn materialize_manual(&self, upload: ManualUpload) -> Result<CatalogItem, IngestError> {
        if upload.bytes.is_empty() {
            return Err(IngestError::MalformedInput(
                "an image file is required".to_string(),
            ));
        }

        let ext = upload
            .original_name
            .as_deref()
            .and_then(extension_from_segment)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let file_name = managed_file_name(ext);

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::write(self.uploads_dir.join(&file_name), &upload.bytes).await?;

        let form = upload.form;
        let text = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
        let title = form
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(MANUAL_TITLE)
            .to_string();
        let quantity = form.quantity.as_deref().and_then(parse_quantity).unwrap_or(1);
        let category = category_or_default(form.category.as_deref());

        let details = ItemDetails {
            width: text(form.width),
            height: text(form.height),
            price: text(form.price),
            mold_price: text(form.mold_price),
            quantity,
            description: text(form.description),
        };

        Ok(CatalogItem::create(
            MANUAL_UPLOAD_SENTINEL,
            format!("{MANAGED_PREFIX}{file_name}"),
            title,
            category,
            details,
        ))
    }

    /// Delete the managed image of a removed item, if it has one.
    pub async fn reclaim(&self, item: &CatalogItem) {
        let Some(name) = item.managed_file_name() else {
            return;
        };
        let path = self.uploads_dir.join(name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), "could not remove image: {e}");
        }
    }
}

/// Fresh managed file name with the given extension (including the dot).
pub fn managed_file_name(ext: String) -> String {
    format!("{}{ext}", uuid::Uuid::new_v4())
}

/// Extension of the last path segment of `locator`, query and fragment
/// ignored. Falls back to [`DEFAULT_EXTENSION`].
pub fn extension_of(locator: &str) -> String {
    let path = match Url::parse(locator) {
        Ok(url) => url.path().to_string(),
        Err(_) => locator
            .split(['?', '#'])
            .next()
            .unwrap_or(locator)
            .to_string(),
    };
    let segment = path.rsplit('/').next().unwrap_or("");
    extension_from_segment(segment).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn extension_from_segment(segment: &str) -> Option<String> {
    let ext = Path::new(segment).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{ext}"))
}
