//! Bulk and search item handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::types::PageResponse;
use metahub_service::item::ItemSearch;

use crate::dto::request::{BulkCreateBody, BulkUpdateBody, ItemIdsBody};
use crate::dto::response::{ApiResponse, DeletedResponse, ItemView, item_views};
use crate::error::ApiResult;
use crate::extractors::{ApiQuery, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// Query for a batch lookup.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    /// Comma-separated item IDs.
    pub ids: String,
}

impl BatchQuery {
    fn parse_ids(&self) -> Result<Vec<Uuid>, AppError> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
            })
            .collect()
    }
}

/// GET /v1/items/search?container_code=...&zone=...
pub async fn search_items(
    State(state): State<AppState>,
    ApiQuery(search): ApiQuery<ItemSearch>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ItemView>>>> {
    let page = state
        .item_service
        .search(&search, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.try_map(ItemView::try_from)?)))
}

/// GET /v1/items/batch?ids=a,b,c
pub async fn get_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BatchQuery>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ItemView>>>> {
    let ids = query.parse_ids()?;
    let page = state
        .item_service
        .get_many(&ids, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.try_map(ItemView::try_from)?)))
}

/// POST /v1/items
pub async fn create_items(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<BulkCreateBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<ItemView>>>)> {
    let requests = body.items.into_iter().map(Into::into).collect();
    let created = state.item_service.create_many(requests).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item_views(created)?))))
}

/// PUT /v1/items
pub async fn update_items(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<BulkUpdateBody>,
) -> ApiResult<Json<ApiResponse<Vec<ItemView>>>> {
    let requests = body.items.into_iter().map(Into::into).collect();
    let updated = state.item_service.update_many(&body.ids, requests).await?;
    Ok(Json(ApiResponse::ok(item_views(updated)?)))
}

/// DELETE /v1/items
pub async fn delete_items(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ItemIdsBody>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let deleted = state.item_service.delete_many(&body.ids).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}
