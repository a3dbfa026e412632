// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Link resolution: turn an arbitrary web link into a title and an image locator.
//!
//! ## Order
//!
//! 1. Duplicate check against the known `originalUrl` values. No network.
//! 2. [`DirectImage`]: the link path ends in a raster image extension.
//! 3. [`PlatformProbe`]: photo-sharing post, probed for its raw media URL.
//! 4. [`MetadataScrape`]: OpenGraph preview tags of the page.
//!
//! The chain stops at the first strategy yielding a non-empty image locator.
//! A strategy that fails for any reason (network error, timeout, bad
//! status, nothing found) abstains and the next one runs.

pub mod direct;
pub mod platform;
pub mod scrape;

pub use direct::DirectImage;
pub use platform::PlatformProbe;
pub use scrape::MetadataScrape;

use crate::acquisition::http_client::HttpClient;
use crate::config::PlatformSettings;
use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;
use vitrine_catalog::{CatalogItem, MANUAL_UPLOAD_SENTINEL};

/// A title and image locator determined for a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub title: String,
    pub image_locator: String,
}

/// Outcome of running the chain on one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Resolved),
    /// The link is already catalogued.
    Duplicate,
    /// No strategy found an image, or the link is malformed.
    Unresolvable,
}

/// A syntactically valid http(s) link, keeping the caller's exact text.
#[derive(Debug, Clone)]
pub struct Link {
    raw: String,
    url: Url,
}

impl Link {
    /// Parse `raw`. Returns `None` for anything that is not an absolute
    /// http or https URL with a host.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }
        Some(Self {
            raw: raw.trim().to_string(),
            url,
        })
    }

    /// The link exactly as submitted (surrounding whitespace removed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// One way of resolving a link.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to resolve `link`. `None` means this strategy abstains.
    async fn try_resolve(&self, link: &Link) -> Option<Resolved>;
}

/// The `originalUrl` values already taken. Compared as raw strings.
#[derive(Debug, Clone, Default)]
pub struct KnownLinks {
    links: HashSet<String>,
}

impl KnownLinks {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a CatalogItem>) -> Self {
        let mut known = Self::default();
        for item in items {
            known.insert(item.original_url.as_str());
        }
        known
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Record a link. The manual-entry sentinel is never recorded.
    pub fn insert(&mut self, link: impl Into<String>) {
        let link = link.into();
        if link != MANUAL_UPLOAD_SENTINEL {
            self.links.insert(link);
        }
    }
}

/// Ordered list of strategies tried until one succeeds.
pub struct ResolutionChain {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl ResolutionChain {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// Direct image, then platform probe, then metadata scrape.
    pub fn standard(client: HttpClient, platform: &PlatformSettings) -> Self {
        Self::new(vec![
            Box::new(DirectImage),
            Box::new(PlatformProbe::new(
                client.clone(),
                platform.domains.clone(),
                platform.media_suffix.clone(),
            )),
            Box::new(MetadataScrape::new(client)),
        ])
    }

    #[cfg(test)]
    fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve `link` against the links already catalogued.
    pub async fn resolve(&self, link: &str, known: &KnownLinks) -> Resolution {
        if known.contains(link) {
            tracing::debug!(link, "duplicate link");
            return Resolution::Duplicate;
        }

        let Some(parsed) = Link::parse(link) else {
            tracing::debug!(link, "malformed link");
            return Resolution::Unresolvable;
        };

        for strategy in &self.strategies {
            match strategy.try_resolve(&parsed).await {
                Some(resolved) if !resolved.image_locator.trim().is_empty() => {
                    tracing::debug!(
                        link,
                        strategy = strategy.name(),
                        image = %resolved.image_locator,
                        "link resolved"
                    );
                    return Resolution::Resolved(resolved);
                }
                _ => tracing::debug!(link, strategy = strategy.name(), "strategy abstained"),
            }
        }

        Resolution::Unresolvable
    }
}
