//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use metahub_core::config::AppConfig;
use metahub_database::CatalogStore;
use metahub_service::{CollectionService, ItemService, TemplateService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Catalog store (PostgreSQL or in-memory)
    pub store: Arc<dyn CatalogStore>,

    // ── Services ─────────────────────────────────────────────
    /// Item service
    pub item_service: Arc<ItemService>,
    /// Attribute template service
    pub template_service: Arc<TemplateService>,
    /// Collection service
    pub collection_service: Arc<CollectionService>,
}

impl AppState {
    /// Wire the services on top of a store.
    pub fn new(config: AppConfig, store: Arc<dyn CatalogStore>) -> Self {
        let item_service = Arc::new(ItemService::new(
            Arc::clone(&store),
            config.catalog.clone(),
        ));
        let template_service = Arc::new(TemplateService::new(Arc::clone(&store)));
        let collection_service = Arc::new(CollectionService::new(
            Arc::clone(&store),
            &config.catalog,
        ));

        Self {
            config: Arc::new(config),
            store,
            item_service,
            template_service,
            collection_service,
        }
    }
}
