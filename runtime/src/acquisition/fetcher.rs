// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Copy remote images into managed storage.
//!
//! The body is streamed chunk by chunk to disk, so large images never sit
//! fully in memory. Transport errors, non-success statuses and write errors
//! all surface as the same [`FetchFailure`]. A partially written file is
//! removed before the failure is returned.

use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// An image could not be materialized locally.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not fetch {locator}: {reason}")]
pub struct FetchFailure {
    pub locator: String,
    pub reason: String,
}

impl FetchFailure {
    fn new(locator: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Copies the resource at a locator to a local path.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Write the resource at `locator` to `destination` and return that path.
    async fn fetch(&self, locator: &str, destination: &Path) -> Result<PathBuf, FetchFailure>;
}

/// [`AssetFetcher`] over HTTP, presenting a browser identity and a referer.
#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: HttpClient,
    referer: String,
}

impl HttpAssetFetcher {
    pub fn new(client: HttpClient, referer: impl Into<String>) -> Self {
        Self {
            client,
            referer: referer.into(),
        }
    }

    async fn stream_to(&self, locator: &str, destination: &Path) -> Result<u64, FetchFailure> {
        let mut response = self
            .client
            .get_stream(locator, &self.referer)
            .await
            .map_err(|e| FetchFailure::new(locator, format!("{e:#}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::new(locator, format!("status {status}")));
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchFailure::new(locator, e))?;
        }

        let mut out = tokio::fs::File::create(destination)
            .await
            .map_err(|e| FetchFailure::new(locator, e))?;

        let mut bytes: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchFailure::new(locator, e))?
        {
            out.write_all(&chunk)
                .await
                .map_err(|e| FetchFailure::new(locator, e))?;
            bytes = bytes.saturating_add(chunk.len() as u64);
        }
        out.flush().await.map_err(|e| FetchFailure::new(locator, e))?;

        Ok(bytes)
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, locator: &str, destination: &Path) -> Result<PathBuf, FetchFailure> {
        match self.stream_to(locator, destination).await {
            Ok(bytes) => {
                tracing::debug!(locator, bytes, path = %destination.display(), "image stored");
                Ok(destination.to_path_buf())
            }
            Err(failure) => {
                if tokio::fs::try_exists(destination).await.unwrap_or(false) {
                    let _ = tokio::fs::remove_file(destination).await;
                }
                Err(failure)
            }
        }
    }
}
