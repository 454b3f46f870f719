//! # metahub-api
//!
//! HTTP API layer for MetaHub built on Axum: route definitions, request
//! extractors, DTOs, error mapping and the middleware stack.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
