//! Attribute template handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use metahub_core::types::PageResponse;
use metahub_entity::template::AttributeTemplate;

use crate::dto::request::TemplateBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiQuery, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// Filter for the template listing.
#[derive(Debug, Deserialize)]
pub struct TemplateListQuery {
    /// Owning project.
    pub project_code: String,
}

/// GET /v1/template?project_code=...
pub async fn list_templates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TemplateListQuery>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<AttributeTemplate>>>> {
    let page = state
        .template_service
        .list(&query.project_code, pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /v1/template/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<AttributeTemplate>>> {
    let template = state.template_service.get(id).await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// POST /v1/template
pub async fn create_template(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TemplateBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AttributeTemplate>>)> {
    let template = state.template_service.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(template))))
}

/// PUT /v1/template/{id}
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<TemplateBody>,
) -> ApiResult<Json<ApiResponse<AttributeTemplate>>> {
    let template = state.template_service.update(id, body.into()).await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// DELETE /v1/template/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    state.template_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "id": id }))))
}
