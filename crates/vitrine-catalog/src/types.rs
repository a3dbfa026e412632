//! Core data types for catalog items and their commerce details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// `originalUrl` of every manually entered item. The only value allowed to repeat.
pub const MANUAL_UPLOAD_SENTINEL: &str = "manual_upload";

/// Title used when nothing better could be resolved for a link.
pub const DEFAULT_TITLE: &str = "New Product";

/// Title given to links that point straight at an image.
pub const IMAGE_TITLE: &str = "Image Product";

/// Title given to manual entries submitted without one.
pub const MANUAL_TITLE: &str = "Manual Product";

/// Public path prefix of images held in managed storage.
pub const MANAGED_PREFIX: &str = "/uploads/";

/// A product record in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub stock_code: String,
    /// Publication flag. Absent means published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_xml: Option<bool>,
    #[serde(default = "default_category")]
    pub category: String,
    pub original_url: String,
    pub image_url: String,
    pub title: String,
    #[serde(default)]
    pub details: ItemDetails,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Build a new published item with a fresh id, stock code and timestamp.
    pub fn create(
        original_url: impl Into<String>,
        image_url: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        details: ItemDetails,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stock_code: crate::stock::generate_stock_code(),
            in_xml: Some(true),
            category: category.into(),
            original_url: original_url.into(),
            image_url: image_url.into(),
            title: title.into(),
            details,
            created_at: Utc::now(),
        }
    }

    /// Whether the item is flagged for the feed (`inXml`, defaulting to true).
    pub fn is_published(&self) -> bool {
        self.in_xml.unwrap_or(true)
    }

    /// Both sale price and mold price are present.
    pub fn is_complete(&self) -> bool {
        self.details.is_complete()
    }

    /// Published and complete.
    pub fn is_feed_eligible(&self) -> bool {
        self.is_published() && self.is_complete()
    }

    /// Entered by hand rather than resolved from a link.
    pub fn is_manual(&self) -> bool {
        self.original_url == MANUAL_UPLOAD_SENTINEL
    }

    /// File name inside managed storage, if the image is held locally.
    pub fn managed_file_name(&self) -> Option<&str> {
        self.image_url
            .strip_prefix(MANAGED_PREFIX)
            .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."))
    }
}

/// Commerce attributes attached to an item. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub width: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub height: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mold_price: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Default for ItemDetails {
    fn default() -> Self {
        Self {
            width: String::new(),
            height: String::new(),
            price: String::new(),
            mold_price: String::new(),
            quantity: default_quantity(),
            description: String::new(),
        }
    }
}

impl ItemDetails {
    pub fn is_complete(&self) -> bool {
        !self.price.trim().is_empty() && !self.mold_price.trim().is_empty()
    }

    /// Overwrite every field the patch carries, keep the rest.
    pub fn apply(&mut self, patch: &DetailsPatch) {
        if let Some(v) = &patch.width {
            self.width = v.clone();
        }
        if let Some(v) = &patch.height {
            self.height = v.clone();
        }
        if let Some(v) = &patch.price {
            self.price = v.clone();
        }
        if let Some(v) = &patch.mold_price {
            self.mold_price = v.clone();
        }
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
    }
}

/// Partial update of [`ItemDetails`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsPatch {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub mold_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_quantity")]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
}

/// Edit applied by [`crate::edit::update_item`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub details: Option<DetailsPatch>,
}

/// Category to use for a caller-supplied label.
pub fn category_or_default(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_quantity() -> u32 {
    1
}

/// Parse a quantity typed into a form. Blank or unparseable input yields `None`.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
}

// Records written by form submissions carry numbers and strings interchangeably.

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Text(s) => s,
            Loose::Number(n) => n.to_string(),
            Loose::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?.map(Loose::into_text))
}

fn lenient_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(lenient_opt_quantity(d)?.unwrap_or_else(default_quantity))
}

fn lenient_opt_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?.and_then(|v| parse_quantity(&v.into_text())))
}
