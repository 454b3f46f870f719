//! Route handlers organized by domain.

pub mod collection;
pub mod health;
pub mod item;
pub mod items;
pub mod template;
