//! Element service: the persistence gateway.
//!
//! Picks the backend for each call, clamps paging input and rejects empty
//! request bodies before any storage is touched.
//!
//! - Reads use the backend named by the caller's `source`.
//! - Writes use the database whenever a connection is configured, else the
//!   JSON document.
//! - `save_all` always overwrites the JSON document.

use periodica_common::PeriodicaError;
use periodica_persistence::{
    Element, ElementPage, ElementPersistence, ExternalDbPersistService, FilePersistService,
    JsonFileStore, SqlElementStore, StorageMode,
};
use tracing::info;

use crate::model::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

const MISSING_CONNECTION_MESSAGE: &str =
    "Database connection string 'DefaultConnection' is not configured.";

/// Clamp paging input: missing or non-positive values become the defaults.
pub fn normalize_paging(page: Option<i64>, page_size: Option<i64>) -> (u64, u64) {
    let clamp = |value: Option<i64>, default: u64| match value {
        Some(v) if v > 0 => v as u64,
        _ => default,
    };
    (clamp(page, DEFAULT_PAGE), clamp(page_size, DEFAULT_PAGE_SIZE))
}

pub struct ElementService {
    database: Option<ExternalDbPersistService>,
    file: FilePersistService,
}

impl ElementService {
    /// `sql` is `None` when no connection string is configured.
    pub fn new(document: JsonFileStore, sql: Option<SqlElementStore>) -> Self {
        Self {
            database: sql.map(|sql| ExternalDbPersistService::new(sql, document.clone())),
            file: FilePersistService::new(document),
        }
    }

    pub fn database(&self) -> Option<&ExternalDbPersistService> {
        self.database.as_ref()
    }

    pub fn document(&self) -> &JsonFileStore {
        self.file.store()
    }

    /// Backend that create and upsert go to
    pub fn write_mode(&self) -> StorageMode {
        self.writer().storage_mode()
    }

    fn writer(&self) -> &dyn ElementPersistence {
        match &self.database {
            Some(db) => db,
            None => &self.file,
        }
    }

    fn reader(&self, mode: StorageMode) -> anyhow::Result<&dyn ElementPersistence> {
        match mode {
            StorageMode::Json => Ok(&self.file),
            StorageMode::Db => match &self.database {
                Some(db) => Ok(db),
                None => Err(
                    PeriodicaError::ConfigError(MISSING_CONNECTION_MESSAGE.to_string()).into(),
                ),
            },
        }
    }

    pub async fn read(
        &self,
        mode: StorageMode,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> anyhow::Result<ElementPage> {
        let (page, page_size) = normalize_paging(page, page_size);
        self.reader(mode)?.read(page, page_size).await
    }

    pub async fn create(&self, element: Option<Element>) -> anyhow::Result<Element> {
        let element = element.ok_or_else(|| missing_body("element"))?;
        let writer = self.writer();
        let created = writer.create(element).await?;
        info!(
            id = created.id,
            mode = %writer.storage_mode(),
            "Element created"
        );
        Ok(created)
    }

    pub async fn upsert(&self, element: Option<Element>) -> anyhow::Result<Element> {
        let element = element.ok_or_else(|| missing_body("element"))?;
        let writer = self.writer();
        let upserted = writer.upsert(element).await?;
        info!(
            id = upserted.id,
            mode = %writer.storage_mode(),
            "Element upserted"
        );
        Ok(upserted)
    }

    /// Replace the JSON document with `elements` as given. Identities are
    /// not checked for uniqueness.
    pub async fn save_all(&self, elements: Option<Vec<Element>>) -> anyhow::Result<usize> {
        let elements = elements.ok_or_else(|| missing_body("element list"))?;
        self.document().save_all(&elements).await?;
        info!(count = elements.len(), "Element document overwritten");
        Ok(elements.len())
    }
}

fn missing_body(what: &str) -> anyhow::Error {
    PeriodicaError::IllegalArgument(format!("request body must contain an {}", what)).into()
}
