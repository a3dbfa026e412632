// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Product feed: the published, complete part of the catalog as XML.

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use vitrine_catalog::{CatalogItem, DEFAULT_CATEGORY};

/// Prefix of the mold product name.
pub const MOLD_NAME_PREFIX: &str = "Silicone Mold";

/// Render the feed for `items`. Managed image paths are made absolute with
/// `base_url` (e.g. `https://shop.example`).
pub fn render_feed(items: &[CatalogItem], base_url: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("products")))?;

    for item in items.iter().filter(|i| i.is_feed_eligible()) {
        write_product(&mut writer, item, base_url)?;
    }

    writer.write_event(Event::End(BytesEnd::new("products")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_product(writer: &mut Writer<Cursor<Vec<u8>>>, item: &CatalogItem, base_url: &str) -> Result<()> {
    let d = &item.details;
    let category = if item.category.trim().is_empty() {
        DEFAULT_CATEGORY
    } else {
        item.category.as_str()
    };
    let mold_name = format!("{MOLD_NAME_PREFIX} {}", item.title);
    let quantity = d.quantity.to_string();
    let image = absolute_image_url(&item.image_url, base_url);

    let fields: [(&str, &str); 12] = [
        ("id", item.stock_code.as_str()),
        ("stock_code", item.stock_code.as_str()),
        ("category", category),
        ("name", item.title.as_str()),
        ("name_mold", mold_name.as_str()),
        ("price", d.price.as_str()),
        ("stock_quantity", quantity.as_str()),
        ("mold_price", d.mold_price.as_str()),
        ("width", d.width.as_str()),
        ("height", d.height.as_str()),
        ("description", d.description.as_str()),
        ("image", image.as_str()),
    ];

    writer.write_event(Event::Start(BytesStart::new("product")))?;
    for (tag, value) in fields {
        if value.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(tag)))?;
            continue;
        }
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("product")))?;
    Ok(())
}

/// Remote URLs pass through; anything else is joined onto `base_url`.
pub fn absolute_image_url(image_url: &str, base_url: &str) -> String {
    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        return image_url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if image_url.starts_with('/') {
        format!("{base}{image_url}")
    } else {
        format!("{base}/{image_url}")
    }
}
