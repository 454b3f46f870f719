//! Item queries.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use metahub_core::error::{AppError, ErrorKind};
use metahub_core::ltree::{Label, LabelPath};
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_entity::item::{
    ContainerType, ExtendedExtra, Item, ItemDetails, ItemExtended, ItemStorage,
};

use super::{DETAIL_COLUMNS, DETAIL_JOIN, ITEM_COLUMNS, PgCatalogTransaction, write_error};
use crate::store::{ItemQuery, ItemRepository};

/// An item row joined with its storage and extended rows.
#[derive(Debug, FromRow)]
pub(crate) struct DetailsRow {
    #[sqlx(flatten)]
    item: Item,
    storage_id: Uuid,
    location_uri: Option<String>,
    version: Option<String>,
    extended_id: Uuid,
    extra: Json<ExtendedExtra>,
}

impl From<DetailsRow> for ItemDetails {
    fn from(row: DetailsRow) -> Self {
        let item_id = row.item.id;
        Self {
            item: row.item,
            storage: ItemStorage {
                id: row.storage_id,
                item_id,
                location_uri: row.location_uri,
                version: row.version,
            },
            extended: ItemExtended {
                id: row.extended_id,
                item_id,
                extra: row.extra,
            },
        }
    }
}

/// Append the location filter of a search to a `WHERE` clause.
fn push_search_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &ItemQuery) {
    builder
        .push(" WHERE i.container_code = ")
        .push_bind(query.container_code.clone())
        .push(" AND i.zone = ")
        .push_bind(query.zone)
        .push(" AND i.archived = ")
        .push_bind(query.archived);
    if let Some(name) = &query.name {
        builder.push(" AND i.name = ").push_bind(name.clone());
    }
    match &query.parent_path {
        Some(path) if query.recursive => {
            builder
                .push(" AND i.parent_path ~ ")
                .push_bind(path.subtree_pattern())
                .push("::lquery");
        }
        Some(path) => {
            builder
                .push(" AND i.parent_path = ")
                .push_bind(path.clone())
                .push("::ltree");
        }
        None if !query.recursive => {
            builder.push(" AND i.parent_path IS NULL");
        }
        None => {}
    }
}

impl PgCatalogTransaction {
    async fn select_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
        locking: &str,
    ) -> AppResult<Vec<Item>> {
        let column = if archived { "restore_path" } else { "parent_path" };
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i \
             WHERE i.container_code = $1 AND i.zone = $2 AND i.archived = $3 \
             AND i.{column} ~ $4::lquery \
             ORDER BY nlevel(i.{column}) ASC, i.created_time ASC{locking}"
        ))
        .bind(container_code)
        .bind(zone)
        .bind(archived)
        .bind(prefix.subtree_pattern())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load subtree", e))
    }
}

#[async_trait]
impl ItemRepository for PgCatalogTransaction {
    async fn find_item(&mut self, id: Uuid) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    async fn find_details(&mut self, id: Uuid) -> AppResult<Option<ItemDetails>> {
        let row = sqlx::query_as::<_, DetailsRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_JOIN} WHERE i.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))?;
        Ok(row.map(ItemDetails::from))
    }

    async fn find_details_many(
        &mut self,
        ids: &[Uuid],
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count items", e))?;

        let rows = sqlx::query_as::<_, DetailsRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_JOIN} WHERE i.id = ANY($1) \
             ORDER BY i.created_time ASC, i.id ASC LIMIT $2 OFFSET $3"
        ))
        .bind(ids.to_vec())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))?;

        Ok(PageResponse::new(
            rows.into_iter().map(ItemDetails::from).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_by_exact_path(
        &mut self,
        container_code: &str,
        zone: i32,
        path: Option<&LabelPath>,
        name: &Label,
        archived: bool,
    ) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i \
             WHERE i.container_code = $1 AND i.zone = $2 AND i.name = $3 AND i.archived = $4 \
             AND i.parent_path IS NOT DISTINCT FROM $5::ltree \
             LIMIT 1"
        ))
        .bind(container_code)
        .bind(zone)
        .bind(name)
        .bind(archived)
        .bind(path)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item by path", e))
    }

    async fn find_name_folder(
        &mut self,
        container_code: &str,
        zone: i32,
        container_type: ContainerType,
        name: &Label,
    ) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i \
             WHERE i.type = 'name_folder' AND i.container_code = $1 AND i.zone = $2 \
             AND i.container_type = $3 AND i.name = $4 \
             LIMIT 1"
        ))
        .bind(container_code)
        .bind(zone)
        .bind(container_type)
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find name folder", e))
    }

    async fn find_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
    ) -> AppResult<Vec<Item>> {
        self.select_subtree(container_code, zone, prefix, archived, "")
            .await
    }

    async fn lock_subtree(
        &mut self,
        container_code: &str,
        zone: i32,
        prefix: &LabelPath,
        archived: bool,
    ) -> AppResult<Vec<Item>> {
        self.select_subtree(container_code, zone, prefix, archived, " FOR UPDATE")
            .await
    }

    async fn search(
        &mut self,
        query: &ItemQuery,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM items i");
        push_search_filter(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count items", e))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_JOIN}"));
        push_search_filter(&mut select, query);
        select
            .push(" ORDER BY i.created_time ASC, i.id ASC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = select
            .build_query_as::<DetailsRow>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search items", e))?;

        Ok(PageResponse::new(
            rows.into_iter().map(ItemDetails::from).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_storage(&mut self, item_id: Uuid) -> AppResult<Option<ItemStorage>> {
        sqlx::query_as::<_, ItemStorage>(
            "SELECT id, item_id, location_uri, version FROM storage WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find storage", e))
    }

    async fn find_extended(&mut self, item_id: Uuid) -> AppResult<Option<ItemExtended>> {
        sqlx::query_as::<_, ItemExtended>(
            "SELECT id, item_id, extra FROM extended WHERE item_id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find extended", e))
    }

    async fn insert_item(&mut self, details: &ItemDetails) -> AppResult<()> {
        let item = &details.item;
        sqlx::query(
            "INSERT INTO items (id, parent, parent_path, restore_path, archived, type, zone, \
             name, size, owner, container_code, container_type, created_time, last_updated_time) \
             VALUES ($1, $2, $3::ltree, $4::ltree, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(item.id)
        .bind(item.parent)
        .bind(&item.parent_path)
        .bind(&item.restore_path)
        .bind(item.archived)
        .bind(item.item_type)
        .bind(item.zone)
        .bind(&item.name)
        .bind(item.size)
        .bind(&item.owner)
        .bind(&item.container_code)
        .bind(item.container_type)
        .bind(item.created_time)
        .bind(item.last_updated_time)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to create item"))?;

        sqlx::query(
            "INSERT INTO storage (id, item_id, location_uri, version) VALUES ($1, $2, $3, $4)",
        )
        .bind(details.storage.id)
        .bind(item.id)
        .bind(&details.storage.location_uri)
        .bind(&details.storage.version)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to create storage"))?;

        sqlx::query("INSERT INTO extended (id, item_id, extra) VALUES ($1, $2, $3)")
            .bind(details.extended.id)
            .bind(item.id)
            .bind(&details.extended.extra)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error("Failed to create extended"))?;

        Ok(())
    }

    async fn update_item(&mut self, item: &Item) -> AppResult<()> {
        sqlx::query(
            "UPDATE items SET parent = $2, parent_path = $3::ltree, restore_path = $4::ltree, \
             archived = $5, name = $6, size = $7, owner = $8, last_updated_time = $9 \
             WHERE id = $1",
        )
        .bind(item.id)
        .bind(item.parent)
        .bind(&item.parent_path)
        .bind(&item.restore_path)
        .bind(item.archived)
        .bind(&item.name)
        .bind(item.size)
        .bind(&item.owner)
        .bind(item.last_updated_time)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to update item"))?;
        Ok(())
    }

    async fn update_storage(&mut self, storage: &ItemStorage) -> AppResult<()> {
        sqlx::query("UPDATE storage SET location_uri = $2, version = $3 WHERE id = $1")
            .bind(storage.id)
            .bind(&storage.location_uri)
            .bind(&storage.version)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error("Failed to update storage"))?;
        Ok(())
    }

    async fn update_extended(&mut self, extended: &ItemExtended) -> AppResult<()> {
        sqlx::query("UPDATE extended SET extra = $2 WHERE id = $1")
            .bind(extended.id)
            .bind(&extended.extra)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error("Failed to update extended"))?;
        Ok(())
    }

    async fn delete_item(&mut self, id: Uuid) -> AppResult<()> {
        for sql in [
            "DELETE FROM items_collections WHERE item_id = $1",
            "DELETE FROM extended WHERE item_id = $1",
            "DELETE FROM storage WHERE item_id = $1",
            "DELETE FROM items WHERE id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete item", e)
                })?;
        }
        Ok(())
    }
}
