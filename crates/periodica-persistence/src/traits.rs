//! Persistence trait for the element backends
//!
//! Two implementations exist: [`crate::FilePersistService`] keeps the JSON
//! document as the backend of record, [`crate::ExternalDbPersistService`]
//! writes to the SQL table and mirrors it into the document.

use async_trait::async_trait;

use crate::model::{Element, ElementPage, StorageMode};

/// Element persistence operations
#[async_trait]
pub trait ElementPersistence: Send + Sync {
    /// The backend this implementation reads from and writes to
    fn storage_mode(&self) -> StorageMode;

    /// Read one page. `page` and `page_size` are already clamped to >= 1.
    async fn read(&self, page: u64, page_size: u64) -> anyhow::Result<ElementPage>;

    /// Insert a new element, assigning an identity when `id` is 0
    async fn create(&self, element: Element) -> anyhow::Result<Element>;

    /// Insert or replace by identity, assigning one when `id` is 0
    async fn upsert(&self, element: Element) -> anyhow::Result<Element>;
}
