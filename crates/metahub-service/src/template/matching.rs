//! Attribute payload validation against a template.

use serde_json::Value;
use uuid::Uuid;

use metahub_core::error::AppError;
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, TemplateRepository};
use metahub_entity::item::AttributeValues;
use metahub_entity::template::{AttributeTemplate, AttributeType};

/// Whether `attributes` are acceptable for `template`.
///
/// With no template only an empty payload matches. Otherwise the payload may
/// not carry more values than the template defines, every required
/// attribute must be present, and a multiple-choice value must be one of
/// the allowed options when the template lists any.
pub fn attributes_match_template(
    attributes: &AttributeValues,
    template: Option<&AttributeTemplate>,
) -> bool {
    let Some(template) = template else {
        return attributes.is_empty();
    };
    let definitions = template.definitions();
    if attributes.len() > definitions.len() {
        return false;
    }

    definitions.iter().all(|def| match attributes.get(&def.name) {
        None => def.optional,
        Some(value) => match (&def.attr_type, &def.options) {
            (AttributeType::MultipleChoice, Some(options)) if !options.is_empty() => {
                matches!(value, Value::String(s) if options.contains(s))
            }
            _ => true,
        },
    })
}

/// Load the referenced template and check `attributes` against it.
pub async fn check_attributes(
    tx: &mut dyn CatalogTransaction,
    template_id: Option<Uuid>,
    attributes: &AttributeValues,
) -> AppResult<()> {
    let template = match template_id {
        Some(id) => Some(tx.find_template(id).await?.ok_or_else(|| {
            AppError::not_found(format!("Attribute template {id} not found"))
        })?),
        None => None,
    };
    if !attributes_match_template(attributes, template.as_ref()) {
        return Err(AppError::validation(
            "Attributes do not match attribute template",
        ));
    }
    Ok(())
}
