// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Links that already point at an image.

use super::{Link, ResolveStrategy, Resolved};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use vitrine_catalog::IMAGE_TITLE;

fn image_path_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)\.(jpeg|jpg|gif|png|webp)$").ok())
        .as_ref()
}

/// Whether the URL path ends in a raster image extension.
pub fn is_image_path(path: &str) -> bool {
    image_path_pattern().is_some_and(|re| re.is_match(path))
}

/// Uses the link itself as the image locator. Never touches the network.
pub struct DirectImage;

#[async_trait]
impl ResolveStrategy for DirectImage {
    fn name(&self) -> &'static str {
        "direct_image"
    }

    async fn try_resolve(&self, link: &Link) -> Option<Resolved> {
        if !is_image_path(link.url().path()) {
            return None;
        }
        Some(Resolved {
            title: IMAGE_TITLE.to_string(),
            image_locator: link.as_str().to_string(),
        })
    }
}
