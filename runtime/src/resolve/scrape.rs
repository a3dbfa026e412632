// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fallback: read the page's social preview tags.

use super::{Link, ResolveStrategy, Resolved};
use crate::acquisition::http_client::HttpClient;
use crate::acquisition::structured::extract_preview;
use async_trait::async_trait;
use vitrine_catalog::DEFAULT_TITLE;

/// Fetches the page and takes its preview title and image.
pub struct MetadataScrape {
    client: HttpClient,
}

impl MetadataScrape {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResolveStrategy for MetadataScrape {
    fn name(&self) -> &'static str {
        "metadata_scrape"
    }

    async fn try_resolve(&self, link: &Link) -> Option<Resolved> {
        let page = match self.client.get_page(link.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(link = link.as_str(), "page fetch failed: {e:#}");
                return None;
            }
        };

        if !page.is_success() {
            tracing::debug!(link = link.as_str(), status = page.status, "page fetch rejected");
            return None;
        }

        let preview = extract_preview(&page.body, &page.final_url);
        let image = preview.image?;

        Some(Resolved {
            title: preview.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            image_locator: image,
        })
    }
}
