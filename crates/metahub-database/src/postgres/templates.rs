//! Attribute template queries.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::error::{AppError, ErrorKind};
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_entity::template::AttributeTemplate;

use super::{PgCatalogTransaction, write_error};
use crate::store::TemplateRepository;

#[async_trait]
impl TemplateRepository for PgCatalogTransaction {
    async fn find_template(&mut self, id: Uuid) -> AppResult<Option<AttributeTemplate>> {
        sqlx::query_as::<_, AttributeTemplate>(
            "SELECT id, name, project_code, attributes FROM attribute_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find template", e))
    }

    async fn list_templates(
        &mut self,
        project_code: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<AttributeTemplate>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attribute_templates WHERE project_code = $1")
                .bind(project_code)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count templates", e)
                })?;

        let templates = sqlx::query_as::<_, AttributeTemplate>(
            "SELECT id, name, project_code, attributes FROM attribute_templates \
             WHERE project_code = $1 ORDER BY name ASC, id ASC LIMIT $2 OFFSET $3",
        )
        .bind(project_code)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list templates", e))?;

        Ok(PageResponse::new(
            templates,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn insert_template(&mut self, template: &AttributeTemplate) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO attribute_templates (id, name, project_code, attributes) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.project_code)
        .bind(&template.attributes)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to create template"))?;
        Ok(())
    }

    async fn update_template(&mut self, template: &AttributeTemplate) -> AppResult<()> {
        sqlx::query(
            "UPDATE attribute_templates SET name = $2, project_code = $3, attributes = $4 \
             WHERE id = $1",
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.project_code)
        .bind(&template.attributes)
        .execute(&mut *self.tx)
        .await
        .map_err(write_error("Failed to update template"))?;
        Ok(())
    }

    async fn delete_template(&mut self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM attribute_templates WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete template", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
