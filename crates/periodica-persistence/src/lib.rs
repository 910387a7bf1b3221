//! Periodica Persistence - element storage over a JSON document and a SQL table
//!
//! This crate provides:
//! - The `Element` record model and its SeaORM entity
//! - `JsonFileStore` and `SqlElementStore`, the raw storage primitives
//! - The `ElementPersistence` trait and its two backends

pub mod entity;
pub mod file;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

pub use traits::ElementPersistence;

pub use file::{DOCUMENT_FILE_NAME, FilePersistService, JsonFileStore, parse_elements};

pub use sql::{ExternalDbPersistService, SqlElementStore};

pub use model::{
    Element, ElementPage, StorageMode, fallback_elements, identity_after, next_identity,
};
