//! # metahub-core
//!
//! Core crate for MetaHub. Contains configuration schemas, the unified
//! error system, pagination/sorting types, and the ltree label codec used
//! to store item names and hierarchical paths.
//!
//! This crate has **no** internal dependencies on other MetaHub crates.

pub mod config;
pub mod error;
pub mod ltree;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
