//! Attribute template CRUD.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_database::{CatalogStore, CatalogTransaction, TemplateRepository};
use metahub_entity::template::{AttributeDefinition, AttributeTemplate};

/// Fields of a template as supplied on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInput {
    /// Template name.
    pub name: String,
    /// Owning project.
    pub project_code: String,
    /// Ordered attribute definitions.
    pub attributes: Vec<AttributeDefinition>,
}

impl TemplateInput {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Template name cannot be empty"));
        }
        if self.project_code.trim().is_empty() {
            return Err(AppError::validation("project_code cannot be empty"));
        }
        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if attribute.name.trim().is_empty() {
                return Err(AppError::validation("Attribute names cannot be empty"));
            }
            if !seen.insert(attribute.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate attribute '{}'",
                    attribute.name
                )));
            }
        }
        Ok(())
    }
}

/// Manages attribute templates.
#[derive(Clone)]
pub struct TemplateService {
    /// Catalog store.
    store: Arc<dyn CatalogStore>,
}

impl TemplateService {
    /// Creates a new template service.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Gets a template by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<AttributeTemplate> {
        let mut tx = self.store.begin().await?;
        tx.find_template(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute template {id} not found")))
    }

    /// Lists the templates of a project.
    pub async fn list(
        &self,
        project_code: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<AttributeTemplate>> {
        let mut tx = self.store.begin().await?;
        tx.list_templates(project_code, page).await
    }

    /// Creates a template.
    pub async fn create(&self, input: TemplateInput) -> AppResult<AttributeTemplate> {
        input.validate()?;
        let template = AttributeTemplate::new(input.name, input.project_code, input.attributes);

        let mut tx = self.store.begin().await?;
        tx.insert_template(&template).await?;
        tx.commit().await?;

        info!(template_id = %template.id, project_code = %template.project_code, "Attribute template created");
        Ok(template)
    }

    /// Replaces the name, project and attributes of a template.
    pub async fn update(&self, id: Uuid, input: TemplateInput) -> AppResult<AttributeTemplate> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        let mut template = tx
            .find_template(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute template {id} not found")))?;
        template.name = input.name;
        template.project_code = input.project_code;
        template.attributes.0 = input.attributes;
        tx.update_template(&template).await?;
        tx.commit().await?;

        info!(template_id = %id, "Attribute template updated");
        Ok(template)
    }

    /// Deletes a template. Items keep the attribute values they carry.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_template(id).await? {
            return Err(AppError::not_found(format!("Attribute template {id} not found")));
        }
        tx.commit().await?;

        info!(template_id = %id, "Attribute template deleted");
        Ok(())
    }
}
