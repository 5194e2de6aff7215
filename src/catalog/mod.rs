//! Static quest, rank and boss catalog.
//!
//! The catalog is read-only content: the engine looks things up in it but
//! never changes it. A built-in catalog ships with the binary and can be
//! replaced by a `catalog.json` in the data directory.

pub mod data;
pub mod loader;
pub mod types;

pub use data::builtin_catalog;
pub use loader::{load_catalog_or_builtin, CatalogError};
pub use types::{BossDef, Catalog, QuestDef, RankDef, SideQuestDef};
