//! Catalog persistence.
//!
//! The catalog is a flat list of [`CatalogItem`] values, newest first. Each
//! operation reads or rewrites the whole list. Coordinating concurrent
//! writers is the caller's job; the file store only guarantees that a single
//! write never leaves a half-written file behind.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{CatalogError, CatalogResult};
use crate::types::CatalogItem;

/// Storage seam used by the ingestion pipeline and the editing operations.
pub trait CatalogStore: Send + Sync {
    /// Every item, in stored order.
    fn list_all(&self) -> CatalogResult<Vec<CatalogItem>>;

    /// Put `new_items` ahead of the stored items, keeping their order, and persist.
    fn append_and_commit(&self, new_items: Vec<CatalogItem>) -> CatalogResult<()>;

    /// Replace the stored list wholesale.
    fn replace_all(&self, items: Vec<CatalogItem>) -> CatalogResult<()>;
}

/// Catalog kept as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty catalog if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> CatalogResult<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            write_json_atomic(&store.path, &Vec::<CatalogItem>::new())?;
            tracing::debug!("created empty catalog at {}", store.path.display());
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileStore {
    fn list_all(&self) -> CatalogResult<Vec<CatalogItem>> {
        read_json(&self.path)
    }

    fn append_and_commit(&self, new_items: Vec<CatalogItem>) -> CatalogResult<()> {
        if new_items.is_empty() {
            return Ok(());
        }
        let current = self.list_all()?;
        let mut merged = new_items;
        merged.extend(current);
        write_json_atomic(&self.path, &merged)
    }

    fn replace_all(&self, items: Vec<CatalogItem>) -> CatalogResult<()> {
        write_json_atomic(&self.path, &items)
    }
}

/// Catalog held in memory. Used by tests and one-shot tooling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<CatalogItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> CatalogResult<std::sync::MutexGuard<'_, Vec<CatalogItem>>> {
        self.items
            .lock()
            .map_err(|_| CatalogError::InvalidInput("memory store lock poisoned".to_string()))
    }
}

impl CatalogStore for MemoryStore {
    fn list_all(&self) -> CatalogResult<Vec<CatalogItem>> {
        Ok(self.lock()?.clone())
    }

    fn append_and_commit(&self, new_items: Vec<CatalogItem>) -> CatalogResult<()> {
        let mut items = self.lock()?;
        let mut merged = new_items;
        merged.append(&mut items);
        *items = merged;
        Ok(())
    }

    fn replace_all(&self, items: Vec<CatalogItem>) -> CatalogResult<()> {
        *self.lock()? = items;
        Ok(())
    }
}

/// Read a JSON document from `path`.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write `value` as pretty JSON through a sibling temp file and a rename.
pub(crate) fn write_json_atomic<T: serde::Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> CatalogResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let payload = serde_json::to_vec_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, payload)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemDetails, DEFAULT_CATEGORY};
    use chrono::Utc;

    fn make_item(id: &str, url: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            stock_code: "STK-TEST1".to_string(),
            in_xml: Some(true),
            category: DEFAULT_CATEGORY.to_string(),
            original_url: url.to_string(),
            image_url: format!("/uploads/{id}.jpg"),
            title: "Item".to_string(),
            details: ItemDetails::default(),
            created_at: Utc::now(),
        }
    }

    fn ids(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_open_creates_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_append_prepends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).unwrap();
        store
            .append_and_commit(vec![make_item("old", "https://a.example/old")])
            .unwrap();
        store
            .append_and_commit(vec![
                make_item("a", "https://a.example/a"),
                make_item("b", "https://a.example/b"),
            ])
            .unwrap();

        let reopened = JsonFileStore::open(dir.path().join("db.json")).unwrap();
        assert_eq!(ids(&reopened.list_all().unwrap()), vec!["a", "b", "old"]);
        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[test]
    fn test_replace_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("db.json")).unwrap();
        store
            .append_and_commit(vec![make_item("a", "u1"), make_item("b", "u2")])
            .unwrap();
        store.replace_all(vec![make_item("c", "u3")]).unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), vec!["c"]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(matches!(store.list_all(), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_memory_store_prepends() {
        let store = MemoryStore::with_items(vec![make_item("old", "u0")]);
        store
            .append_and_commit(vec![make_item("x", "u1"), make_item("y", "u2")])
            .unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), vec!["x", "y", "old"]);
    }
}
