// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ingestion: resolve links, materialize items, commit them to the catalog.
//!
//! Interactive submissions handle one link at a time. Batch imports read the
//! catalog once, process their links in order and write every accepted item
//! in a single commit. Duplicates within a batch are caught because each
//! accepted link joins the known set before the next one is resolved.

pub mod csv_links;
pub mod materializer;

pub use csv_links::links_from_csv;
pub use materializer::{ManualForm, ManualUpload, Materializer};

use crate::acquisition::fetcher::HttpAssetFetcher;
use crate::acquisition::http_client::HttpClient;
use crate::config::Settings;
use crate::resolve::{KnownLinks, Resolution, ResolutionChain};
use serde::Serialize;
use std::sync::Arc;
use vitrine_catalog::{category_or_default, CatalogError, CatalogItem, CatalogStore};

/// Errors that stop an ingestion request.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("storage unavailable: {0}")]
    Store(#[from] CatalogError),

    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of submitting a single link.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Created(CatalogItem),
    DuplicateRejected(String),
    UnresolvableRejected(String),
}

/// Summary of a batch import.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub accepted_items: Vec<CatalogItem>,
    pub accepted_count: usize,
    pub duplicate_count: usize,
    pub unresolvable_count: usize,
}

/// Runs links through the resolution chain and the materializer.
pub struct Ingestor {
    chain: ResolutionChain,
    materializer: Materializer,
}

impl Ingestor {
    pub fn new(chain: ResolutionChain, materializer: Materializer) -> Self {
        Self {
            chain,
            materializer,
        }
    }

    /// Standard chain and HTTP fetcher sharing one client.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = HttpClient::new(&settings.http);
        let chain = ResolutionChain::standard(client.clone(), &settings.platform);
        let fetcher = HttpAssetFetcher::new(client, settings.http.referer.clone());
        Self::new(
            chain,
            Materializer::new(Arc::new(fetcher), settings.uploads_dir()),
        )
    }

    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Resolve one link and, if accepted, commit its item.
    pub async fn submit(
        &self,
        store: &dyn CatalogStore,
        link: &str,
        category: Option<&str>,
    ) -> Result<SubmitOutcome, IngestError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(IngestError::MalformedInput("link is required".to_string()));
        }

        let existing = store.list_all()?;
        let known = KnownLinks::from_items(&existing);
        let category = category_or_default(category);

        match self.chain.resolve(link, &known).await {
            Resolution::Duplicate => {
                tracing::info!(link, "rejected duplicate link");
                Ok(SubmitOutcome::DuplicateRejected(link.to_string()))
            }
            Resolution::Unresolvable => {
                tracing::info!(link, "could not resolve link");
                Ok(SubmitOutcome::UnresolvableRejected(link.to_string()))
            }
            Resolution::Resolved(resolved) => {
                let item = self.materializer.materialize(&resolved, link, &category).await;
                store.append_and_commit(vec![item.clone()])?;
                tracing::info!(id = %item.id, link, "item created");
                Ok(SubmitOutcome::Created(item))
            }
        }
    }

    /// Process `links` in order against a snapshot of the catalog. Nothing
    /// is written.
    pub async fn run_batch(
        &self,
        existing: &[CatalogItem],
        links: &[String],
        category: Option<&str>,
    ) -> BatchReport {
        let mut known = KnownLinks::from_items(existing);
        let category = category_or_default(category);
        let mut report = BatchReport::default();

        for link in links {
            let link = link.trim();
            if link.is_empty() {
                continue;
            }
            match self.chain.resolve(link, &known).await {
                Resolution::Resolved(resolved) => {
                    let item = self.materializer.materialize(&resolved, link, &category).await;
                    known.insert(link);
                    report.accepted_items.push(item);
                }
                Resolution::Duplicate => report.duplicate_count += 1,
                Resolution::Unresolvable => report.unresolvable_count += 1,
            }
        }

        report.accepted_count = report.accepted_items.len();
        report
    }

    /// Batch import: one catalog read, one commit of the accepted items.
    ///
    /// Links added by other writers after the read are not seen by the
    /// duplicate check.
    pub async fn import_batch(
        &self,
        store: &dyn CatalogStore,
        links: &[String],
        category: Option<&str>,
    ) -> Result<BatchReport, IngestError> {
        let existing = store.list_all()?;
        let report = self.run_batch(&existing, links, category).await;

        if !report.accepted_items.is_empty() {
            store.append_and_commit(report.accepted_items.clone())?;
        }
        tracing::info!(
            submitted = links.len(),
            accepted = report.accepted_count,
            duplicates = report.duplicate_count,
            unresolvable = report.unresolvable_count,
            "batch import finished"
        );
        Ok(report)
    }

    /// Store a hand-entered item.
    pub async fn submit_manual(
        &self,
        store: &dyn CatalogStore,
        upload: ManualUpload,
    ) -> Result<CatalogItem, IngestError> {
        let item = self.materializer.materialize_manual(upload).await?;
        store.append_and_commit(vec![item.clone()])?;
        tracing::info!(id = %item.id, "manual item created");
        Ok(item)
    }
}
