//! SQL-based element persistence (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! [`SqlElementStore`] issues single-statement operations against the
//! `elements` table. [`ExternalDbPersistService`] builds the gateway
//! semantics on top of it and mirrors the table into the JSON document
//! after every write.

use async_trait::async_trait;
use periodica_common::PeriodicaError;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Schema, SqlErr,
};
use tokio::sync::OnceCell;

use crate::entity::element;
use crate::file::JsonFileStore;
use crate::model::{Element, ElementPage, StorageMode, identity_after};
use crate::traits::ElementPersistence;

/// Translate a SeaORM error into the application taxonomy.
fn map_db_err(e: DbErr) -> anyhow::Error {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = e.sql_err() {
        return PeriodicaError::ConstraintViolation(message).into();
    }
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            PeriodicaError::BackendUnavailable(e.to_string()).into()
        }
        _ => PeriodicaError::DatabaseError(e.to_string()).into(),
    }
}

/// Row-level access to the `elements` table.
///
/// The connection pool is opened on first use. A failed open is reported
/// to that caller and attempted again by the next one.
pub struct SqlElementStore {
    options: Option<ConnectOptions>,
    connection: OnceCell<DatabaseConnection>,
}

impl SqlElementStore {
    pub fn new(options: ConnectOptions) -> Self {
        Self {
            options: Some(options),
            connection: OnceCell::new(),
        }
    }

    /// Wrap an already opened connection
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            options: None,
            connection: OnceCell::new_with(Some(db)),
        }
    }

    async fn db(&self) -> anyhow::Result<&DatabaseConnection> {
        self.connection
            .get_or_try_init(|| async {
                let Some(options) = self.options.clone() else {
                    return Err(anyhow::Error::from(PeriodicaError::BackendUnavailable(
                        "no connection options".to_string(),
                    )));
                };
                tracing::info!("Opening database connection pool");
                Database::connect(options).await.map_err(|e| {
                    anyhow::Error::from(PeriodicaError::BackendUnavailable(e.to_string()))
                })
            })
            .await
    }

    /// `CREATE TABLE IF NOT EXISTS` for the element entity
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let db = self.db().await?;
        let backend = db.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(element::Entity);
        stmt.if_not_exists();
        db.execute(backend.build(&stmt)).await.map_err(map_db_err)?;
        Ok(())
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        element::Entity::find()
            .count(self.db().await?)
            .await
            .map_err(map_db_err)
    }

    /// Rows ordered by identity, skipping `offset` and returning at most `limit`
    pub async fn page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Element>> {
        let rows = element::Entity::find()
            .order_by_asc(element::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db().await?)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Element::from).collect())
    }

    /// `MAX(id) + 1`, or `1` for an empty table
    pub async fn next_identity(&self) -> anyhow::Result<i32> {
        let max = element::Entity::find()
            .select_only()
            .column_as(element::Column::Id.max(), "max_id")
            .into_tuple::<Option<i32>>()
            .one(self.db().await?)
            .await
            .map_err(map_db_err)?
            .flatten();
        identity_after(max)
    }

    pub async fn exists(&self, id: i32) -> anyhow::Result<bool> {
        let count = element::Entity::find_by_id(id)
            .count(self.db().await?)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    /// Fails with a constraint violation when the identity is taken
    pub async fn insert(&self, element: &Element) -> anyhow::Result<()> {
        element::Entity::insert(element::ActiveModel::from(element))
            .exec_without_returning(self.db().await?)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Returns the number of rows touched; zero when the identity is absent
    pub async fn update(&self, element: &Element) -> anyhow::Result<u64> {
        let mut active = element::ActiveModel::from(element);
        active.id = NotSet;
        let result = element::Entity::update_many()
            .set(active)
            .filter(element::Column::Id.eq(element.id))
            .exec(self.db().await?)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// The whole table ordered by identity
    pub async fn dump_all(&self) -> anyhow::Result<Vec<Element>> {
        let rows = element::Entity::find()
            .order_by_asc(element::Column::Id)
            .all(self.db().await?)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(Element::from).collect())
    }
}

/// SQL table as the backend of record, mirrored into the JSON document
pub struct ExternalDbPersistService {
    sql: SqlElementStore,
    mirror: JsonFileStore,
}

impl ExternalDbPersistService {
    pub fn new(sql: SqlElementStore, mirror: JsonFileStore) -> Self {
        Self { sql, mirror }
    }

    pub fn sql(&self) -> &SqlElementStore {
        &self.sql
    }

    /// Overwrite the JSON document with the full table.
    ///
    /// Costs a full table scan per write.
    async fn resync(&self) -> anyhow::Result<()> {
        let rows = self.sql.dump_all().await?;
        self.mirror.save_all(&rows).await?;
        tracing::info!(
            path = %self.mirror.path().display(),
            count = rows.len(),
            "Element document resynchronized from database"
        );
        Ok(())
    }
}

#[async_trait]
impl ElementPersistence for ExternalDbPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Db
    }

    async fn read(&self, page: u64, page_size: u64) -> anyhow::Result<ElementPage> {
        let total = self.sql.count().await?;
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let items = self.sql.page(offset, page_size).await?;
        Ok(ElementPage::new(items, total, page, page_size))
    }

    async fn create(&self, mut element: Element) -> anyhow::Result<Element> {
        if element.needs_identity() {
            element.id = self.sql.next_identity().await?;
        }
        self.sql.insert(&element).await?;
        self.resync().await?;
        Ok(element)
    }

    async fn upsert(&self, mut element: Element) -> anyhow::Result<Element> {
        if element.needs_identity() {
            element.id = self.sql.next_identity().await?;
        }
        // Not atomic: a concurrent insert of the same id fails on the key
        if self.sql.exists(element.id).await? {
            self.sql.update(&element).await?;
        } else {
            self.sql.insert(&element).await?;
        }
        self.resync().await?;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sqlite_store(dir: &tempfile::TempDir) -> SqlElementStore {
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("elements.db").display()
        );
        let mut options = ConnectOptions::new(url);
        options.max_connections(1);
        let store = SqlElementStore::new(options);
        store.ensure_schema().await.unwrap();
        store
    }

    fn element(id: i32, sign: &str) -> Element {
        Element {
            id,
            sign: Some(sign.to_string()),
            name: None,
            position: 1,
            molar_mass: 1.0,
        }
    }

    fn ids(elements: &[Element]) -> Vec<i32> {
        elements.iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn test_store_operations_on_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = sqlite_store(&dir).await;

        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.next_identity().await.unwrap(), 1);
        assert!(!store.exists(1).await.unwrap());
        assert!(store.dump_all().await.unwrap().is_empty());
        assert_eq!(store.update(&element(1, "H")).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_insert_page_and_next_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        for (id, sign) in [(4, "Be"), (1, "H"), (2, "He")] {
            store.insert(&element(id, sign)).await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.next_identity().await.unwrap(), 5);
        assert!(store.exists(4).await.unwrap());
        assert!(!store.exists(3).await.unwrap());
        assert_eq!(ids(&store.page(0, 2).await.unwrap()), vec![1, 2]);
        assert_eq!(ids(&store.page(2, 2).await.unwrap()), vec![4]);
        assert_eq!(ids(&store.dump_all().await.unwrap()), vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_store_round_trips_null_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        let bare = Element {
            id: 7,
            ..Default::default()
        };
        store.insert(&bare).await.unwrap();

        let rows = store.dump_all().await.unwrap();
        assert_eq!(rows, vec![bare]);
    }

    #[tokio::test]
    async fn test_store_update_changes_matching_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        store.insert(&element(1, "H")).await.unwrap();

        let updated = Element::new(1, "H", "Hydrogen", 1, 1.008);
        assert_eq!(store.update(&updated).await.unwrap(), 1);
        assert_eq!(store.dump_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_store_duplicate_insert_is_constraint_violation() {
        let dir = tempfile::tempdir().unwrap();
        let store = sqlite_store(&dir).await;
        store.insert(&element(1, "H")).await.unwrap();

        let err = store.insert(&element(1, "He")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_store_unreachable_database_is_backend_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("missing/nested/elements.db").display()
        );
        let store = SqlElementStore::new(ConnectOptions::new(url));

        let err = store.count().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::BackendUnavailable(_))
        ));
        // The failed open is not cached
        assert!(store.count().await.is_err());
    }

    #[tokio::test]
    async fn test_db_service_read_pages_table() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExternalDbPersistService::new(
            sqlite_store(&dir).await,
            JsonFileStore::in_content_root(dir.path()),
        );
        for id in 1..=5 {
            service.sql().insert(&element(id, "X")).await.unwrap();
        }

        let page = service.read(2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
        assert_eq!(ids(&page.items), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_db_service_read_empty_table_has_no_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExternalDbPersistService::new(
            sqlite_store(&dir).await,
            JsonFileStore::in_content_root(dir.path()),
        );

        let page = service.read(1, 10).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_db_service_create_assigns_identity_and_resyncs() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = JsonFileStore::in_content_root(dir.path());
        let service = ExternalDbPersistService::new(sqlite_store(&dir).await, mirror.clone());
        service.sql().insert(&element(1, "H")).await.unwrap();
        service.sql().insert(&element(3, "Li")).await.unwrap();

        let created = service.create(element(0, "Be")).await.unwrap();
        assert_eq!(created.id, 4);

        let table = service.sql().dump_all().await.unwrap();
        assert_eq!(ids(&table), vec![1, 3, 4]);
        assert_eq!(mirror.load_all().await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_db_service_resync_replaces_stale_document() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = JsonFileStore::in_content_root(dir.path());
        mirror
            .save_all(&[element(99, "Og"), element(50, "Sn")])
            .await
            .unwrap();
        let service = ExternalDbPersistService::new(sqlite_store(&dir).await, mirror.clone());

        service.create(element(0, "H")).await.unwrap();
        assert_eq!(ids(&mirror.load_all().await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_db_service_create_duplicate_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = JsonFileStore::in_content_root(dir.path());
        let service = ExternalDbPersistService::new(sqlite_store(&dir).await, mirror.clone());
        service.create(element(2, "He")).await.unwrap();

        let err = service.create(element(2, "He")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::ConstraintViolation(_))
        ));
        assert_eq!(ids(&mirror.load_all().await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_db_service_upsert_inserts_then_updates() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = JsonFileStore::in_content_root(dir.path());
        let service = ExternalDbPersistService::new(sqlite_store(&dir).await, mirror.clone());
        service.sql().insert(&element(5, "B")).await.unwrap();

        let inserted = service.upsert(element(0, "C")).await.unwrap();
        assert_eq!(inserted.id, 6);

        let replacement = Element::new(5, "B", "Boron", 13, 10.81);
        let updated = service.upsert(replacement.clone()).await.unwrap();
        assert_eq!(updated, replacement);

        let unknown = service.upsert(element(2, "He")).await.unwrap();
        assert_eq!(unknown.id, 2);

        let table = service.sql().dump_all().await.unwrap();
        assert_eq!(ids(&table), vec![2, 5, 6]);
        assert_eq!(table[1], replacement);
        assert_eq!(mirror.load_all().await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_db_service_create_after_max_identity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = JsonFileStore::in_content_root(dir.path());
        let service = ExternalDbPersistService::new(sqlite_store(&dir).await, mirror.clone());
        service.sql().insert(&element(i32::MAX, "Og")).await.unwrap();

        let err = service.sql().next_identity().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::IllegalArgument(_))
        ));

        let err = service.create(element(0, "H")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PeriodicaError>(),
            Some(PeriodicaError::IllegalArgument(_))
        ));
        assert_eq!(
            ids(&service.sql().dump_all().await.unwrap()),
            vec![i32::MAX]
        );
        assert!(!mirror.path().exists());
    }
}
