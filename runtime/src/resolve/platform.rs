// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Photo-sharing posts whose raw media sits at a predictable URL.

use super::{Link, ResolveStrategy, Resolved};
use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use vitrine_catalog::DEFAULT_TITLE;

/// Probes `<post url><media suffix>` with a HEAD request and accepts it on 200.
pub struct PlatformProbe {
    client: HttpClient,
    domains: Vec<String>,
    media_suffix: String,
}

impl PlatformProbe {
    pub fn new(client: HttpClient, domains: Vec<String>, media_suffix: impl Into<String>) -> Self {
        Self {
            client,
            domains: domains.into_iter().map(|d| d.to_ascii_lowercase()).collect(),
            media_suffix: media_suffix.into(),
        }
    }

    /// Whether the link's host is one of the configured domains or a subdomain of one.
    pub fn handles(&self, link: &Link) -> bool {
        let Some(host) = link.url().host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }

    /// Candidate media URL: query and fragment dropped, one trailing slash
    /// removed, media suffix appended.
    pub fn candidate_for(&self, link: &str) -> String {
        let base = link.split(['?', '#']).next().unwrap_or(link);
        let base = base.strip_suffix('/').unwrap_or(base);
        format!("{base}{}", self.media_suffix)
    }
}

#[async_trait]
impl ResolveStrategy for PlatformProbe {
    fn name(&self) -> &'static str {
        "platform_probe"
    }

    async fn try_resolve(&self, link: &Link) -> Option<Resolved> {
        if !self.handles(link) {
            return None;
        }

        let candidate = self.candidate_for(link.as_str());
        match self.client.head_status(&candidate).await {
            Ok(200) => Some(Resolved {
                title: DEFAULT_TITLE.to_string(),
                image_locator: candidate,
            }),
            Ok(status) => {
                tracing::debug!(candidate = %candidate, status, "media probe rejected");
                None
            }
            Err(e) => {
                tracing::debug!(candidate = %candidate, "media probe failed: {e:#}");
                None
            }
        }
    }
}
