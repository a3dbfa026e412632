// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async HTTP client wrapping reqwest.
//!
//! One client is built per process with a browser user-agent, a bounded
//! redirect policy and the configured timeout. Every call is bounded by that
//! timeout; no call retries.

use crate::config::HttpSettings;
use anyhow::{Context, Result};
use reqwest::header::REFERER;
use std::time::Duration;

/// Response from a page GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client shared by the resolution strategies and the asset fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client presenting the configured user-agent.
    pub fn new(settings: &HttpSettings) -> Self {
        let timeout = Duration::from_millis(settings.timeout_ms);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(settings.user_agent.as_str())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    error = %e,
                    "HTTP client settings rejected, using defaults with per-request timeout"
                );
                reqwest::Client::default()
            });

        Self { client, timeout }
    }

    #[cfg(test)]
    fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET a page and read its body as text.
    pub async fn get_page(&self, url: &str) -> Result<HttpResponse> {
        let r = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r
            .text()
            .await
            .with_context(|| format!("reading body of {url} failed"))?;

        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }

    /// HEAD a URL and return the status code.
    pub async fn head_status(&self, url: &str) -> Result<u16> {
        let r = self
            .client
            .head(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("HEAD {url} failed"))?;
        Ok(r.status().as_u16())
    }

    /// GET a resource for streaming. The body is left unread.
    pub async fn get_stream(&self, url: &str, referer: &str) -> Result<reqwest::Response> {
        let mut builder = self.client.get(url).timeout(self.timeout);
        if !referer.is_empty() {
            builder = builder.header(REFERER, referer);
        }
        builder
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))
    }
}
