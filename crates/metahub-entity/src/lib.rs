//! # metahub-entity
//!
//! Domain entity models for MetaHub. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod collection;
pub mod item;
pub mod template;
