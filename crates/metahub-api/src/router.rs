//! Route definitions for the MetaHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/v1`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(item_routes())
        .merge(items_routes())
        .merge(template_routes())
        .merge(collection_routes());

    Router::new()
        .nest("/v1", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::compression::build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and store connectivity
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Single item CRUD, archive, bequeath, children
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/item", post(handlers::item::create_item))
        .route(
            "/item/{id}",
            get(handlers::item::get_item)
                .put(handlers::item::update_item)
                .delete(handlers::item::delete_item),
        )
        .route("/item/{id}/children", get(handlers::item::list_children))
        .route("/item/{id}/archive", put(handlers::item::set_archived))
        .route("/item/{id}/bequeath", put(handlers::item::bequeath))
}

/// Bulk operations and search
fn items_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            post(handlers::items::create_items)
                .put(handlers::items::update_items)
                .delete(handlers::items::delete_items),
        )
        .route("/items/batch", get(handlers::items::get_items))
        .route("/items/search", get(handlers::items::search_items))
}

/// Attribute template CRUD
fn template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/template",
            get(handlers::template::list_templates).post(handlers::template::create_template),
        )
        .route(
            "/template/{id}",
            get(handlers::template::get_template)
                .put(handlers::template::update_template)
                .delete(handlers::template::delete_template),
        )
}

/// Collections and their members
fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collection",
            get(handlers::collection::list_collections)
                .post(handlers::collection::create_collection)
                .put(handlers::collection::rename_collections),
        )
        .route(
            "/collection/{id}",
            get(handlers::collection::get_collection)
                .delete(handlers::collection::delete_collection),
        )
        .route(
            "/collection/{id}/items",
            get(handlers::collection::list_collection_items)
                .post(handlers::collection::add_collection_items)
                .delete(handlers::collection::remove_collection_items),
        )
}
