//! Collection handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use metahub_core::types::PageResponse;
use metahub_entity::collection::{Collection, CollectionSortKey};
use metahub_entity::item::ItemSortKey;

use crate::dto::request::{CollectionItemsBody, CreateCollectionBody, RenameCollectionsBody};
use crate::dto::response::{ApiResponse, ItemView};
use crate::error::ApiResult;
use crate::extractors::{ApiQuery, PaginationParams, SortParams, ValidatedJson};
use crate::state::AppState;

/// Owner scope for the collection listing.
#[derive(Debug, Deserialize)]
pub struct CollectionListQuery {
    /// Owning user.
    pub owner: String,
    /// Project code.
    pub container_code: String,
}

/// Filter for collection members.
#[derive(Debug, Deserialize)]
pub struct CollectionItemsQuery {
    /// List archived members instead of active ones.
    #[serde(default)]
    pub archived: bool,
}

/// GET /v1/collection?owner=...&container_code=...
pub async fn list_collections(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CollectionListQuery>,
    ApiQuery(sort): ApiQuery<SortParams>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Collection>>>> {
    let sort = sort.into_sort::<CollectionSortKey>("created_time", "desc")?;
    let page = state
        .collection_service
        .list(
            &query.owner,
            &query.container_code,
            sort,
            pagination.into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /v1/collection/{id}
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Collection>>> {
    let collection = state.collection_service.get(id).await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// POST /v1/collection
pub async fn create_collection(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCollectionBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Collection>>)> {
    let collection = state.collection_service.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(collection))))
}

/// PUT /v1/collection
pub async fn rename_collections(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RenameCollectionsBody>,
) -> ApiResult<Json<ApiResponse<Vec<Collection>>>> {
    let renamed = state
        .collection_service
        .rename_many(&body.owner, &body.container_code, body.collections)
        .await?;
    Ok(Json(ApiResponse::ok(renamed)))
}

/// DELETE /v1/collection/{id}
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    state.collection_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "id": id }))))
}

/// GET /v1/collection/{id}/items
pub async fn list_collection_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiQuery(query): ApiQuery<CollectionItemsQuery>,
    ApiQuery(sort): ApiQuery<SortParams>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ItemView>>>> {
    let sort = sort.into_sort::<ItemSortKey>("created_time", "desc")?;
    let page = state
        .collection_service
        .list_items(id, query.archived, sort, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.try_map(ItemView::try_from)?)))
}

/// POST /v1/collection/{id}/items
pub async fn add_collection_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CollectionItemsBody>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    state.collection_service.add_items(id, &body.item_ids).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "id": id, "item_ids": body.item_ids }),
    )))
}

/// DELETE /v1/collection/{id}/items
pub async fn remove_collection_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CollectionItemsBody>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    state
        .collection_service
        .remove_items(id, &body.item_ids)
        .await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "id": id, "item_ids": body.item_ids }),
    )))
}
