//! Integration tests for collections.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use metahub_core::config::AppConfig;

use helpers::{TestApp, id_of};

fn collection(name: &str) -> serde_json::Value {
    json!({ "owner": "admin", "container_code": "project", "name": name })
}

async fn create_collection(app: &TestApp, name: &str) -> String {
    let response = app.request("POST", "/v1/collection", Some(collection(name))).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    id_of(response.data())
}

#[tokio::test]
async fn test_create_list_and_delete() {
    let app = TestApp::new().await;
    let id = create_collection(&app, "favourites").await;
    create_collection(&app, "archive").await;

    let listed = app
        .request(
            "GET",
            "/v1/collection?owner=admin&container_code=project&sorting=name&order=asc",
            None,
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data()["total_items"], 2);
    assert_eq!(listed.data()["items"][0]["name"], "archive");

    let deleted = app.request("DELETE", &format!("/v1/collection/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let missing = app.request("GET", &format!("/v1/collection/{id}"), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_sort_key_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/v1/collection?owner=admin&container_code=project&sorting=secret",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_collection_limit_and_duplicates() {
    let mut config = AppConfig::default();
    config.catalog.max_collections = 2;
    let app = TestApp::with_config(config).await;
    create_collection(&app, "a").await;

    let duplicate = app.request("POST", "/v1/collection", Some(collection("a"))).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    create_collection(&app, "b").await;
    let over = app.request("POST", "/v1/collection", Some(collection("c"))).await;
    assert_eq!(over.status, StatusCode::BAD_REQUEST);
    assert_eq!(over.body["message"], "Cannot create more than 2 collections");
}

#[tokio::test]
async fn test_rename_many() {
    let app = TestApp::new().await;
    let a = create_collection(&app, "a").await;
    let b = create_collection(&app, "b").await;

    let taken = app
        .request(
            "PUT",
            "/v1/collection",
            Some(json!({
                "owner": "admin",
                "container_code": "project",
                "collections": [{ "id": a, "name": "b" }]
            })),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let renamed = app
        .request(
            "PUT",
            "/v1/collection",
            Some(json!({
                "owner": "admin",
                "container_code": "project",
                "collections": [{ "id": a, "name": "first" }, { "id": b, "name": "second" }]
            })),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()[1]["name"], "second");

    let fetched = app.request("GET", &format!("/v1/collection/{a}"), None).await;
    assert_eq!(fetched.data()["name"], "first");
}

#[tokio::test]
async fn test_collection_items() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let docs = id_of(&app.folder("admin", "docs").await);
    let file = id_of(&app.file("admin", "a.txt").await);
    let id = create_collection(&app, "picks").await;

    let added = app
        .request(
            "POST",
            &format!("/v1/collection/{id}/items"),
            Some(json!({ "item_ids": [file, docs] })),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);

    let listed = app
        .request("GET", &format!("/v1/collection/{id}/items?sorting=type&order=asc"), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data()["total_items"], 2);
    assert_eq!(listed.data()["items"][0]["type"], "file");
    assert_eq!(listed.data()["items"][1]["type"], "folder");

    let trash = app
        .request("GET", &format!("/v1/collection/{id}/items?archived=true"), None)
        .await;
    assert_eq!(trash.data()["total_items"], 0);

    let removed = app
        .request(
            "DELETE",
            &format!("/v1/collection/{id}/items"),
            Some(json!({ "item_ids": [file] })),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    let listed = app
        .request("GET", &format!("/v1/collection/{id}/items"), None)
        .await;
    assert_eq!(listed.data()["total_items"], 1);

    let unknown = app
        .request(
            "POST",
            &format!("/v1/collection/{id}/items"),
            Some(json!({ "item_ids": ["00000000-0000-0000-0000-000000000001"] })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}
