//! Application state management
//!
//! This module defines the central application state shared across all handlers.

use periodica_persistence::{JsonFileStore, SqlElementStore};
use tracing::{info, warn};

use crate::service::element::ElementService;

use super::config::Configuration;

/// Application state shared across all handlers
///
/// - `element_service.database()` is Some only when a connection string is configured
/// - the JSON document always lives under `app.content_root`
pub struct AppState {
    pub configuration: Configuration,
    pub element_service: ElementService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("document", &self.element_service.document().path())
            .field("database", &self.element_service.database().is_some())
            .finish()
    }
}

impl AppState {
    pub fn new(configuration: Configuration, element_service: ElementService) -> Self {
        Self {
            configuration,
            element_service,
        }
    }

    /// Build the state from configuration.
    ///
    /// No connection is opened here. The pool is created on the first
    /// database request, unless `db.auto_create_table` asks for the table up
    /// front; a failure then is logged and startup continues.
    pub async fn from_configuration(configuration: Configuration) -> Self {
        let document = JsonFileStore::in_content_root(configuration.content_root());
        info!(path = %document.path().display(), "Element document location");

        let sql = configuration
            .database_connect_options()
            .map(SqlElementStore::new);

        if let Some(sql) = &sql {
            if configuration.auto_create_table() {
                match sql.ensure_schema().await {
                    Ok(()) => info!("Element table ready"),
                    Err(e) => warn!(error = %e, "Could not create element table at startup"),
                }
            }
        } else {
            info!("No database connection configured, writes go to the JSON document");
        }

        Self::new(configuration, ElementService::new(document, sql))
    }
}
