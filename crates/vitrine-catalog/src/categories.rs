//! Category list kept as a JSON array next to the catalog.

use std::path::{Path, PathBuf};

use crate::error::{CatalogError, CatalogResult};
use crate::store::{read_json, write_json_atomic};
use crate::types::DEFAULT_CATEGORY;

/// File-backed list of category labels.
#[derive(Debug, Clone)]
pub struct CategoryBook {
    path: PathBuf,
}

impl CategoryBook {
    /// Open the book at `path`, seeding it with the default category if missing.
    pub fn open(path: impl Into<PathBuf>) -> CatalogResult<Self> {
        let book = Self { path: path.into() };
        if !book.path.exists() {
            write_json_atomic(&book.path, &[DEFAULT_CATEGORY])?;
        }
        Ok(book)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> CatalogResult<Vec<String>> {
        read_json(&self.path)
    }

    /// Add `name` unless already present. Returns the resulting list.
    pub fn add(&self, name: &str) -> CatalogResult<Vec<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("category name is empty".to_string()));
        }
        let mut categories = self.list()?;
        if !categories.iter().any(|c| c == name) {
            categories.push(name.to_string());
            write_json_atomic(&self.path, &categories)?;
        }
        Ok(categories)
    }

    /// Remove `name` if present. Returns the resulting list.
    pub fn remove(&self, name: &str) -> CatalogResult<Vec<String>> {
        let mut categories = self.list()?;
        let before = categories.len();
        categories.retain(|c| c != name);
        if categories.len() != before {
            write_json_atomic(&self.path, &categories)?;
        }
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let book = CategoryBook::open(dir.path().join("categories.json")).unwrap();
        assert_eq!(book.list().unwrap(), vec!["General".to_string()]);
    }

    #[test]
    fn test_add_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let book = CategoryBook::open(dir.path().join("categories.json")).unwrap();
        book.add("Toys").unwrap();
        let list = book.add("Toys").unwrap();
        assert_eq!(list, vec!["General".to_string(), "Toys".to_string()]);

        let list = book.remove("General").unwrap();
        assert_eq!(list, vec!["Toys".to_string()]);
        assert_eq!(book.remove("Missing").unwrap(), vec!["Toys".to_string()]);
    }

    #[test]
    fn test_add_rejects_blank() {
        let dir = tempfile::tempdir().unwrap();
        let book = CategoryBook::open(dir.path().join("categories.json")).unwrap();
        assert!(matches!(book.add("   "), Err(CatalogError::InvalidInput(_))));
    }
}
