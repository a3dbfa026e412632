// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parse social-preview metadata from raw HTML without DOM rendering.
//!
//! OpenGraph tags are read whether declared with `property=` or `name=`.
//! The document `<title>` stands in for a missing `og:title`; the Twitter
//! card image and `<link rel="image_src">` stand in for a missing
//! `og:image`. Uses the `scraper` crate for CSS selector-based parsing.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Preview data declared by a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewData {
    pub title: Option<String>,
    /// Preview image, absolute.
    pub image: Option<String>,
}

/// Extract preview data from raw HTML.
///
/// Relative image URLs are resolved against `base_url`. Empty values are
/// ignored, and only the first occurrence of each tag is kept.
pub fn extract_preview(html: &str, base_url: &str) -> PreviewData {
    let document = Html::parse_document(html);

    let mut og_title = None;
    let mut og_image = None;
    let mut twitter_image = None;

    if let Ok(meta_sel) = Selector::parse("meta") {
        for element in document.select(&meta_sel) {
            let attrs = element.value();
            let key = attrs.attr("property").or_else(|| attrs.attr("name"));
            let Some(key) = key.map(str::trim) else {
                continue;
            };
            let Some(content) = non_empty(attrs.attr("content")) else {
                continue;
            };
            let slot = match key.to_ascii_lowercase().as_str() {
                "og:title" => &mut og_title,
                "og:image" | "og:image:url" => &mut og_image,
                "twitter:image" | "twitter:image:src" => &mut twitter_image,
                _ => continue,
            };
            slot.get_or_insert(content);
        }
    }

    let title = og_title.or_else(|| first_text(&document, "title"));
    let image = og_image
        .or(twitter_image)
        .or_else(|| first_attr(&document, r#"link[rel~="image_src"]"#, "href"))
        .and_then(|image| absolutize(&image, base_url));

    PreviewData { title, image }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_element<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    document.select(&sel).next()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let element = first_element(document, selector)?;
    let text: String = element.text().collect();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    non_empty(first_element(document, selector)?.value().attr(attr))
}

/// Resolve `href` against `base_url`. Absolute `href` values pass through.
fn absolutize(href: &str, base_url: &str) -> Option<String> {
    if let Ok(abs) = Url::parse(href) {
        return Some(abs.to_string());
    }
    Url::parse(base_url)
        .ok()?
        .join(href)
        .ok()
        .map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_first_image() {
        let html = r#"<html><head>
            <title>Shop page</title>
            <meta property="og:title" content="Ceramic Owl">
            <meta property="og:image" content="https://cdn.example.com/owl.png">
            <meta property="og:image" content="https://cdn.example.com/owl-2.png">
        </head><body></body></html>"#;
        let p = extract_preview(html, "https://shop.example.com/owl");
        assert_eq!(p.title.as_deref(), Some("Ceramic Owl"));
        assert_eq!(p.image.as_deref(), Some("https://cdn.example.com/owl.png"));
    }

    #[test]
    fn test_relative_image_resolved() {
        let html = r#"<meta property="og:image" content="/img/cat.webp">"#;
        let p = extract_preview(html, "https://shop.example.com/p/cat?ref=1");
        assert_eq!(p.image.as_deref(), Some("https://shop.example.com/img/cat.webp"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let html = r#"<meta property="og:title" content="  ">
            <meta property="og:image" content="">"#;
        let p = extract_preview(html, "https://example.com/");
        assert_eq!(p, PreviewData::default());
    }

    #[test]
    fn test_og_tags_declared_with_name() {
        let html = r#"<head>
            <meta name="og:title" content="Lotus Mold">
            <meta name="og:image" content="https://cdn.example.com/lotus.jpg">
            <meta name="twitter:image" content="https://cdn.example.com/card.jpg">
        </head>"#;
        let p = extract_preview(html, "https://shop.example.com/");
        assert_eq!(p.title.as_deref(), Some("Lotus Mold"));
        assert_eq!(p.image.as_deref(), Some("https://cdn.example.com/lotus.jpg"));
    }

    #[test]
    fn test_title_element_when_og_title_missing() {
        let html = r#"<html><head><title>
            Ceramic   Owl
        </title><meta property="og:image" content="/owl.png"></head></html>"#;
        let p = extract_preview(html, "https://shop.example.com/p/1");
        assert_eq!(p.title.as_deref(), Some("Ceramic Owl"));
        assert_eq!(p.image.as_deref(), Some("https://shop.example.com/owl.png"));
    }

    #[test]
    fn test_twitter_image_when_og_image_missing() {
        let html = r#"<head><title>Ceramic Owl</title>
            <meta name="twitter:image" content="https://cdn.example.com/card.png">
            <link rel="image_src" href="https://cdn.example.com/src.png"></head>"#;
        let p = extract_preview(html, "https://shop.example.com/");
        assert_eq!(p.title.as_deref(), Some("Ceramic Owl"));
        assert_eq!(p.image.as_deref(), Some("https://cdn.example.com/card.png"));
    }

    #[test]
    fn test_image_src_link_as_last_resort() {
        let html = r#"<head><link rel="image_src" href="/img/owl.jpg"></head>"#;
        let p = extract_preview(html, "https://shop.example.com/p/1");
        assert_eq!(p.image.as_deref(), Some("https://shop.example.com/img/owl.jpg"));
    }

    #[test]
    fn test_page_without_preview_tags() {
        let html = "<html><head></head><body><img src=a.png></body></html>";
        let p = extract_preview(html, "https://example.com/");
        assert_eq!(p, PreviewData::default());
    }
}
