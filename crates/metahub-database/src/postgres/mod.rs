//! PostgreSQL catalog store.
//!
//! Paths live in `ltree` columns. They are bound as text with an explicit
//! `::ltree` cast and read back through `::text`, so the entity types only
//! ever see encoded label strings.

mod collections;
mod items;
mod templates;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use metahub_core::error::{AppError, ErrorKind};
use metahub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::store::{CatalogStore, CatalogTransaction};

/// Item columns with ltree paths cast to text. Expects `items` aliased as `i`.
pub(crate) const ITEM_COLUMNS: &str = "i.id, i.parent, i.parent_path::text AS parent_path, \
     i.restore_path::text AS restore_path, i.archived, i.type, i.zone, i.name, i.size, \
     i.owner, i.container_code, i.container_type, i.created_time, i.last_updated_time";

/// Item columns plus the joined storage (`s`) and extended (`e`) rows.
pub(crate) const DETAIL_COLUMNS: &str = "i.id, i.parent, i.parent_path::text AS parent_path, \
     i.restore_path::text AS restore_path, i.archived, i.type, i.zone, i.name, i.size, \
     i.owner, i.container_code, i.container_type, i.created_time, i.last_updated_time, \
     s.id AS storage_id, s.location_uri, s.version, e.id AS extended_id, e.extra";

/// Join clause matching [`DETAIL_COLUMNS`].
pub(crate) const DETAIL_JOIN: &str =
    "items i JOIN storage s ON s.item_id = i.id JOIN extended e ON e.item_id = i.id";

/// Catalog store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: DatabasePool,
}

impl PgCatalogStore {
    /// Create a store over an existing pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> AppResult<Box<dyn CatalogTransaction>> {
        let tx = self.pool.pool().begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgCatalogTransaction { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        self.pool.ping().await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// One PostgreSQL transaction.
pub struct PgCatalogTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogTransaction for PgCatalogTransaction {
    async fn lock_namespace(&mut self, container_code: &str, zone: i32) -> AppResult<()> {
        debug!(container_code, zone, "Acquiring namespace lock");
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2::text))")
            .bind(container_code)
            .bind(zone)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock namespace", e)
            })?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}

/// Map a write error, turning violations of the catalog's unique indexes
/// into conflicts.
pub(crate) fn write_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let constraint = match &e {
            sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
            _ => None,
        };
        match constraint.as_deref() {
            Some("items_active_name_unique") => {
                AppError::conflict("An active item with this name already exists at this location")
            }
            Some("items_name_folder_unique") => {
                AppError::conflict("A name folder with this name already exists")
            }
            Some("collections_owner_name_unique") => {
                AppError::conflict("A collection with this name already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, context, e),
        }
    }
}
