//! Attribute template entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Value type of a template attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Free text.
    Text,
    /// One of a fixed option list.
    MultipleChoice,
}

/// One attribute definition within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Whether the attribute may be omitted.
    #[serde(default = "default_optional")]
    pub optional: bool,
    /// Value type.
    #[serde(rename = "type", default = "default_attribute_type")]
    pub attr_type: AttributeType,
    /// Allowed values for multiple choice attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A project-scoped set of attribute definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttributeTemplate {
    /// Unique template identifier.
    pub id: Uuid,
    /// Template name.
    pub name: String,
    /// Owning project.
    pub project_code: String,
    /// Ordered attribute definitions.
    pub attributes: Json<Vec<AttributeDefinition>>,
}

impl AttributeTemplate {
    /// Create a new template with a fresh id.
    pub fn new(
        name: impl Into<String>,
        project_code: impl Into<String>,
        attributes: Vec<AttributeDefinition>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            project_code: project_code.into(),
            attributes: Json(attributes),
        }
    }

    /// The attribute definitions.
    pub fn definitions(&self) -> &[AttributeDefinition] {
        &self.attributes.0
    }
}

fn default_optional() -> bool {
    true
}

fn default_attribute_type() -> AttributeType {
    AttributeType::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults() {
        let def: AttributeDefinition = serde_json::from_str(r#"{"name": "colour"}"#).unwrap();
        assert!(def.optional);
        assert_eq!(def.attr_type, AttributeType::Text);
        assert!(def.options.is_none());
    }

    #[test]
    fn test_definition_rejects_unknown_type() {
        let parsed =
            serde_json::from_str::<AttributeDefinition>(r#"{"name": "a", "type": "number"}"#);
        assert!(parsed.is_err());
    }
}
