//! Collection queries.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::error::{AppError, ErrorKind};
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse, Sort};
use metahub_entity::collection::{Collection, CollectionSortKey};
use metahub_entity::item::{ItemDetails, ItemSortKey};

use super::items::DetailsRow;
use super::{DETAIL_COLUMNS, DETAIL_JOIN, PgCatalogTransaction, write_error};
use crate::store::CollectionRepository;

const COLLECTION_COLUMNS: &str =
    "id, name, container_code, owner, created_time, last_updated_time";

#[async_trait]
impl CollectionRepository for PgCatalogTransaction {
    async fn list_collections(
        &mut self,
        owner: &str,
        container_code: &str,
        sort: Sort<CollectionSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Collection>> {
        let total = self.count_collections(owner, container_code).await?;

        // Sort columns come from a closed enum.
        let collections = sqlx::query_as::<_, Collection>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections \
             WHERE owner = $1 AND container_code = $2 \
             ORDER BY {}, id ASC LIMIT $3 OFFSET $4",
            sort.order_by_sql()
        ))
        .bind(owner)
        .bind(container_code)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list collections", e))?;

        Ok(PageResponse::new(
            collections,
            page.page,
            page.page_size,
            total,
        ))
    }

    async fn count_collections(&mut self, owner: &str, container_code: &str) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM collections WHERE owner = $1 AND container_code = $2",
        )
        .bind(owner)
        .bind(container_code)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count collections", e))?;
        Ok(total as u64)
    }

    async fn find_collection(&mut self, id: Uuid) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find collection", e))
    }

    async fn find_collection_by_name(
        &mut self,
        owner: &str,
        container_code: &str,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections \
             WHERE owner = $1 AND container_code = $2 AND name = $3"
        ))
        .bind(owner)
        .bind(container_code)
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find collection", e))
    }

    async fn insert_collection(&mut self, collection: &Collection) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO collections (id, name, container_code, owner, created_time, \
             last_updated_time) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(collection.id)
        .bind(&collection.name)
        .bind(&collection.container_code)
        .bind(&collection.owner)
        .bind(collection.created_time)
        .bind(collection.last_updated_time)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to create collection"))?;
        Ok(())
    }

    async fn update_collection(&mut self, collection: &Collection) -> AppResult<()> {
        sqlx::query("UPDATE collections SET name = $2, last_updated_time = $3 WHERE id = $1")
            .bind(collection.id)
            .bind(&collection.name)
            .bind(collection.last_updated_time)
            .execute(&mut *self.tx)
            .await
            .map_err(write_error("Failed to update collection"))?;
        Ok(())
    }

    async fn delete_collection(&mut self, id: Uuid) -> AppResult<()> {
        for sql in [
            "DELETE FROM items_collections WHERE collection_id = $1",
            "DELETE FROM collections WHERE id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete collection", e)
                })?;
        }
        Ok(())
    }

    async fn add_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO items_collections (item_id, collection_id) \
             SELECT unnest($1::uuid[]), $2 ON CONFLICT DO NOTHING",
        )
        .bind(item_ids.to_vec())
        .bind(collection_id)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to add items to collection"))?;
        Ok(())
    }

    async fn remove_collection_items(
        &mut self,
        collection_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM items_collections WHERE collection_id = $1 AND item_id = ANY($2)")
            .bind(collection_id)
            .bind(item_ids.to_vec())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to remove items from collection",
                    e,
                )
            })?;
        Ok(())
    }

    async fn list_collection_items(
        &mut self,
        collection_id: Uuid,
        archived: bool,
        sort: Sort<ItemSortKey>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ItemDetails>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM items i JOIN items_collections ic ON ic.item_id = i.id \
             WHERE ic.collection_id = $1 AND i.archived = $2",
        )
        .bind(collection_id)
        .bind(archived)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count collection items", e)
        })?;

        let rows = sqlx::query_as::<_, DetailsRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_JOIN} \
             JOIN items_collections ic ON ic.item_id = i.id \
             WHERE ic.collection_id = $1 AND i.archived = $2 \
             ORDER BY i.container_type ASC, {}, i.id ASC LIMIT $3 OFFSET $4",
            sort.order_by_sql()
        ))
        .bind(collection_id)
        .bind(archived)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list collection items", e)
        })?;

        Ok(PageResponse::new(
            rows.into_iter().map(ItemDetails::from).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
