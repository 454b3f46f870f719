//! Single item handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::request::{ArchiveBody, BequeathBody, CreateItemBody, UpdateItemBody};
use crate::dto::response::{
    ApiResponse, DeletedResponse, DepthGroup, ItemView, group_by_depth, item_views,
};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /v1/item/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ItemView>>> {
    let details = state.item_service.get(id).await?;
    Ok(Json(ApiResponse::ok(ItemView::try_from(details)?)))
}

/// GET /v1/item/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<DepthGroup>>>> {
    let entries = state.item_service.children(id).await?;
    Ok(Json(ApiResponse::ok(group_by_depth(entries)?)))
}

/// POST /v1/item
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateItemBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ItemView>>)> {
    let details = state.item_service.create(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ItemView::try_from(details)?)),
    ))
}

/// PUT /v1/item/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateItemBody>,
) -> ApiResult<Json<ApiResponse<ItemView>>> {
    let details = state.item_service.update(id, body.into()).await?;
    Ok(Json(ApiResponse::ok(ItemView::try_from(details)?)))
}

/// PUT /v1/item/{id}/archive
///
/// Returns the root followed by every descendant that moved with it.
pub async fn set_archived(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<ArchiveBody>,
) -> ApiResult<Json<ApiResponse<Vec<ItemView>>>> {
    let details = state.item_service.set_archived(id, body.archived).await?;
    Ok(Json(ApiResponse::ok(item_views(details)?)))
}

/// PUT /v1/item/{id}/bequeath
pub async fn bequeath(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<BequeathBody>,
) -> ApiResult<Json<ApiResponse<Vec<ItemView>>>> {
    let details = state.item_service.bequeath(id, body.into()).await?;
    Ok(Json(ApiResponse::ok(item_views(details)?)))
}

/// DELETE /v1/item/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let deleted = state.item_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}
