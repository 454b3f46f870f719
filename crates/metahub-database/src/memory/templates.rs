//! In-memory attribute templates.

use async_trait::async_trait;
use uuid::Uuid;

use metahub_core::result::AppResult;
use metahub_core::types::{PageRequest, PageResponse};
use metahub_entity::template::AttributeTemplate;

use super::MemoryTransaction;
use crate::store::TemplateRepository;

#[async_trait]
impl TemplateRepository for MemoryTransaction {
    async fn find_template(&mut self, id: Uuid) -> AppResult<Option<AttributeTemplate>> {
        Ok(self.working.templates.get(&id).cloned())
    }

    async fn list_templates(
        &mut self,
        project_code: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<AttributeTemplate>> {
        let mut templates: Vec<AttributeTemplate> = self
            .working
            .templates
            .values()
            .filter(|t| t.project_code == project_code)
            .cloned()
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(page.slice(templates))
    }

    async fn insert_template(&mut self, template: &AttributeTemplate) -> AppResult<()> {
        self.working
            .templates
            .insert(template.id, template.clone());
        Ok(())
    }

    async fn update_template(&mut self, template: &AttributeTemplate) -> AppResult<()> {
        self.working
            .templates
            .insert(template.id, template.clone());
        Ok(())
    }

    async fn delete_template(&mut self, id: Uuid) -> AppResult<bool> {
        Ok(self.working.templates.remove(&id).is_some())
    }
}
