//! File-backed element persistence
//!
//! The whole collection lives in one pretty-printed JSON array. Every save
//! rewrites the complete document; there are no partial or append writes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use periodica_common::PeriodicaError;
use tokio::io::AsyncWriteExt;

use crate::model::{Element, ElementPage, StorageMode, fallback_elements, next_identity};
use crate::traits::ElementPersistence;

/// Fixed document name inside the content root
pub const DOCUMENT_FILE_NAME: &str = "periodictable.json";

/// Parse a document into elements.
///
/// Callers decide what a parse failure means; the stores discard it and fall
/// back to an empty collection.
pub fn parse_elements(text: &str) -> Result<Vec<Element>, serde_json::Error> {
    serde_json::from_str::<Option<Vec<Element>>>(text).map(Option::unwrap_or_default)
}

fn storage_error(action: &str, path: &Path, e: impl std::fmt::Display) -> anyhow::Error {
    PeriodicaError::StorageError(format!("{} {}: {}", action, path.display(), e)).into()
}

/// Reads and writes the JSON document
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for [`DOCUMENT_FILE_NAME`] under the given content root
    pub fn in_content_root(content_root: impl AsRef<Path>) -> Self {
        Self::new(content_root.as_ref().join(DOCUMENT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection.
    ///
    /// A missing document is an empty collection. So is a document that does
    /// not parse: the error is logged and dropped here on purpose.
    pub async fn load_all(&self) -> anyhow::Result<Vec<Element>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error("read", &self.path, e)),
        };

        let elements = parse_elements(&text).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Element document is not valid JSON, treating it as empty"
            );
            Vec::new()
        });

        Ok(elements)
    }

    /// Overwrite the document with the full collection.
    ///
    /// The content is written to a uniquely named sibling and renamed over
    /// the target, so readers see either the old or the new document and
    /// concurrent saves never share a temporary file.
    pub async fn save_all(&self, elements: &[Element]) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(elements)
            .map_err(|e| storage_error("serialize", &self.path, e))?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| storage_error("create directory for", &self.path, e))?;

        // Each save gets its own sibling, removed on drop if never persisted
        let (file, tmp_path) = tempfile::Builder::new()
            .prefix(".periodictable")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| storage_error("create temporary file for", &self.path, e))?
            .into_parts();
        {
            let mut file = tokio::fs::File::from_std(file);
            file.write_all(content.as_bytes())
                .await
                .map_err(|e| storage_error("write", &tmp_path, e))?;
            file.sync_all()
                .await
                .map_err(|e| storage_error("sync", &tmp_path, e))?;
        }

        tmp_path
            .persist(&self.path)
            .map_err(|e| storage_error("replace", &self.path, e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            count = elements.len(),
            "Element document written"
        );

        Ok(())
    }
}

/// JSON document as the backend of record
#[derive(Clone, Debug)]
pub struct FilePersistService {
    store: JsonFileStore,
}

impl FilePersistService {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }
}

#[async_trait]
impl ElementPersistence for FilePersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Json
    }

    async fn read(&self, page: u64, page_size: u64) -> anyhow::Result<ElementPage> {
        let mut elements = self.store.load_all().await?;
        if elements.is_empty() {
            elements = fallback_elements();
        }
        Ok(ElementPage::from_collection(elements, page, page_size))
    }

    async fn create(&self, mut element: Element) -> anyhow::Result<Element> {
        let mut elements = self.store.load_all().await?;
        if element.needs_identity() {
            element.id = next_identity(&elements)?;
        }
        elements.push(element.clone());
        self.store.save_all(&elements).await?;
        Ok(element)
    }

    async fn upsert(&self, mut element: Element) -> anyhow::Result<Element> {
        let mut elements = self.store.load_all().await?;
        if element.needs_identity() {
            // New records go to the front on upsert, unlike create
            element.id = next_identity(&elements)?;
            elements.insert(0, element.clone());
        } else if let Some(existing) = elements.iter_mut().find(|e| e.id == element.id) {
            *existing = element.clone();
        } else {
            elements.push(element.clone());
        }
        self.store.save_all(&elements).await?;
        Ok(element)
    }
}
