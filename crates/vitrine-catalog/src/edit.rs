//! Editing operations applied to items after creation.

use crate::error::{CatalogError, CatalogResult};
use crate::store::CatalogStore;
use crate::types::{CatalogItem, ItemPatch};

/// Merge `patch` into the item with `id` and persist.
///
/// Details are merged field by field. Title and category change only when
/// the patch carries a non-empty value.
pub fn update_item(store: &dyn CatalogStore, id: &str, patch: &ItemPatch) -> CatalogResult<CatalogItem> {
    let mut items = store.list_all()?;
    let item = items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| CatalogError::ItemNotFound(id.to_string()))?;

    if let Some(details) = &patch.details {
        item.details.apply(details);
    }
    if let Some(title) = patch.title.as_deref().filter(|t| !t.is_empty()) {
        item.title = title.to_string();
    }
    if let Some(category) = patch.category.as_deref().filter(|c| !c.is_empty()) {
        item.category = category.to_string();
    }

    let updated = item.clone();
    store.replace_all(items)?;
    Ok(updated)
}

/// Set the publication flag of an item.
pub fn set_published(store: &dyn CatalogStore, id: &str, in_xml: bool) -> CatalogResult<CatalogItem> {
    let mut items = store.list_all()?;
    let item = items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| CatalogError::ItemNotFound(id.to_string()))?;
    item.in_xml = Some(in_xml);

    let updated = item.clone();
    store.replace_all(items)?;
    Ok(updated)
}

/// Remove an item and return it so the caller can reclaim its image.
pub fn remove_item(store: &dyn CatalogStore, id: &str) -> CatalogResult<CatalogItem> {
    let mut items = store.list_all()?;
    let idx = items
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| CatalogError::ItemNotFound(id.to_string()))?;
    let removed = items.remove(idx);
    store.replace_all(items)?;
    Ok(removed)
}
