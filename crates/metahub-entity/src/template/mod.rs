//! Attribute template entities.

pub mod model;

pub use model::{AttributeDefinition, AttributeTemplate, AttributeType};
