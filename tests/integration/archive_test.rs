//! Integration tests for archive and restore.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, id_of};

async fn set_archived(app: &TestApp, id: &str, archived: bool) -> helpers::TestResponse {
    app.request(
        "PUT",
        &format!("/v1/item/{id}/archive"),
        Some(json!({ "archived": archived })),
    )
    .await
}

#[tokio::test]
async fn test_archive_and_restore_subtree() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let docs = id_of(&app.folder("admin", "docs").await);
    let report = id_of(&app.file("admin.docs", "report.txt").await);

    let archived = set_archived(&app, &docs, true).await;
    assert_eq!(archived.status, StatusCode::OK);
    let views = archived.data().as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["archived"], true);
    assert!(views[0]["parent"].is_null());
    assert!(views[0]["parent_path"].is_null());
    assert_eq!(views[0]["restore_path"], "admin");
    assert_eq!(views[1]["restore_path"], "admin.docs");

    let trash = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&archived=true",
            None,
        )
        .await;
    assert_eq!(trash.data()["total_items"], 2);

    let restored = set_archived(&app, &docs, false).await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.data()[0]["parent_path"], "admin");
    assert!(restored.data()[0]["restore_path"].is_null());

    let file = app.get(&report).await;
    assert_eq!(file["archived"], false);
    assert_eq!(file["parent_path"], "admin.docs");
    assert_eq!(file["parent"], docs.as_str());
}

#[tokio::test]
async fn test_archive_twice_is_rejected() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let file = id_of(&app.file("admin", "a.txt").await);

    assert_eq!(set_archived(&app, &file, true).await.status, StatusCode::OK);
    let again = set_archived(&app, &file, true).await;

    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.error_code(), "INVALID_OPERATION");

    let active = id_of(&app.file("admin", "b.txt").await);
    let restore_active = set_archived(&app, &active, false).await;
    assert_eq!(restore_active.error_code(), "INVALID_OPERATION");
}

#[tokio::test]
async fn test_name_folder_cannot_be_archived() {
    let app = TestApp::new().await;
    let root = id_of(&app.name_folder("admin").await);

    let response = set_archived(&app, &root, true).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_OPERATION");
}

#[tokio::test]
async fn test_archived_names_never_collide() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let first = id_of(&app.folder("admin", "docs").await);
    set_archived(&app, &first, true).await;
    let second = id_of(&app.folder("admin", "docs").await);

    let response = set_archived(&app, &second, true).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()[0]["name"], "docs_1");
}

#[tokio::test]
async fn test_restore_into_occupied_slot_gets_suffix() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let old = id_of(&app.file("admin", "report.txt").await);
    set_archived(&app, &old, true).await;
    app.file("admin", "report.txt").await;

    let response = set_archived(&app, &old, false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()[0]["name"], "report_1.txt");
    assert_eq!(response.data()[0]["parent_path"], "admin");
}

#[tokio::test]
async fn test_restore_without_destination_fails() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let docs = id_of(&app.folder("admin", "docs").await);
    let report = id_of(&app.file("admin.docs", "report.txt").await);
    set_archived(&app, &report, true).await;
    app.request("DELETE", &format!("/v1/item/{docs}"), None).await;

    let response = set_archived(&app, &report, false).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_OPERATION");
    assert_eq!(response.body["message"], "restore destination does not exist");
}

#[tokio::test]
async fn test_archived_items_cannot_be_renamed() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let file = id_of(&app.file("admin", "a.txt").await);
    set_archived(&app, &file, true).await;

    let response = app
        .request("PUT", &format!("/v1/item/{file}"), Some(json!({ "name": "b.txt" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_OPERATION");
}
