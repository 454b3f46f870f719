//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use metahub_core::config::{AppConfig, DatabaseProvider};
use metahub_database::MemoryCatalogStore;

/// Container every helper creates items in.
pub const PROJECT: &str = "project";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a test application with custom limits
    pub async fn with_config(mut config: AppConfig) -> Self {
        config.database.provider = DatabaseProvider::Memory;
        let store = Arc::new(MemoryCatalogStore::new());
        let router = metahub_api::build_app(config.clone(), store);
        Self { router, config }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create an item and return its view, asserting success
    pub async fn create(&self, body: Value) -> Value {
        let response = self.request("POST", "/v1/item", Some(body)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.data().clone()
    }

    /// Create the per-user root folder
    pub async fn name_folder(&self, owner: &str) -> Value {
        self.create(item_body("name_folder", None, owner)).await
    }

    /// Create a folder under a dotted display path
    pub async fn folder(&self, parent_path: &str, name: &str) -> Value {
        self.create(item_body("folder", Some(parent_path), name)).await
    }

    /// Create a file under a dotted display path
    pub async fn file(&self, parent_path: &str, name: &str) -> Value {
        self.create(item_body("file", Some(parent_path), name)).await
    }

    /// Fetch an item view, asserting it exists
    pub async fn get(&self, id: &str) -> Value {
        let response = self.request("GET", &format!("/v1/item/{id}"), None).await;
        assert_eq!(response.status, StatusCode::OK, "Get failed: {:?}", response.body);
        response.data().clone()
    }
}

/// Body for `POST /v1/item` in the test project, zone 0
pub fn item_body(item_type: &str, parent_path: Option<&str>, name: &str) -> Value {
    let size = (item_type == "file").then_some(10);
    json!({
        "type": item_type,
        "parent_path": parent_path,
        "zone": 0,
        "name": name,
        "owner": "admin",
        "container_code": PROJECT,
        "container_type": "project",
        "size": size,
    })
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// The `id` of an item view as a string
pub fn id_of(view: &Value) -> String {
    view["id"].as_str().expect("view has no id").to_string()
}
