//! Vitrine catalog: product records sourced from web links, and their flat-file storage.

pub mod categories;
pub mod edit;
pub mod error;
pub mod stock;
pub mod store;
pub mod types;

pub use categories::CategoryBook;
pub use edit::{remove_item, set_published, update_item};
pub use error::{CatalogError, CatalogResult};
pub use stock::generate_stock_code;
pub use store::{CatalogStore, JsonFileStore, MemoryStore};
pub use types::*;
