//! Attribute templates.

pub mod matching;
pub mod service;

pub use matching::{attributes_match_template, check_attributes};
pub use service::{TemplateInput, TemplateService};
