//! Integration tests for item CRUD, search and structural changes.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, id_of, item_body};

async fn seeded() -> (TestApp, String, String) {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let docs = app.folder("admin", "docs").await;
    let report = app.file("admin.docs", "report.txt").await;
    (app, id_of(&docs), id_of(&report))
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/v1/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "connected");
    assert_eq!(response.data()["backend"], "memory");
}

#[tokio::test]
async fn test_create_and_get_item() {
    let (app, docs, report) = seeded().await;

    let view = app.get(&report).await;

    assert_eq!(view["name"], "report.txt");
    assert_eq!(view["type"], "file");
    assert_eq!(view["parent_path"], "admin.docs");
    assert_eq!(view["parent"], docs.as_str());
    assert_eq!(view["archived"], false);
    assert_eq!(view["size"], 10);
    assert!(view["storage"]["id"].is_string());
    assert_eq!(view["extended"]["tags"], json!([]));
}

#[tokio::test]
async fn test_get_missing_item() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/v1/item/00000000-0000-0000-0000-999999999999", None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, _, _) = seeded().await;

    let empty = app
        .request("POST", "/v1/item", Some(item_body("file", Some("admin"), "")))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.error_code(), "VALIDATION_ERROR");

    let dotted = app
        .request("POST", "/v1/item", Some(item_body("folder", Some("admin"), "a.b")))
        .await;
    assert_eq!(dotted.status, StatusCode::BAD_REQUEST);
    assert_eq!(dotted.error_code(), "VALIDATION_ERROR");

    let orphan = app
        .request("POST", "/v1/item", Some(item_body("file", None, "loose.txt")))
        .await;
    assert_eq!(orphan.status, StatusCode::BAD_REQUEST);

    let bad_type = app
        .request("POST", "/v1/item", Some(item_body("symlink", Some("admin"), "x")))
        .await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);

    let missing_parent = app
        .request("POST", "/v1/item", Some(item_body("file", Some("admin.nope"), "x.txt")))
        .await;
    assert_eq!(missing_parent.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let (app, _, _) = seeded().await;

    let response = app
        .request(
            "POST",
            "/v1/item",
            Some(item_body("file", Some("admin.docs"), "report.txt")),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_tag_limit() {
    let (app, _, report) = seeded().await;
    let tags: Vec<String> = (0..11).map(|i| format!("t{i}")).collect();

    let response = app
        .request("PUT", &format!("/v1/item/{report}"), Some(json!({ "tags": tags })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Maximum of 10 tags");
}

#[tokio::test]
async fn test_search_by_location() {
    let (app, _, _) = seeded().await;
    app.file("admin.docs", "notes.txt").await;

    let direct = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&parent_path=admin.docs",
            None,
        )
        .await;
    assert_eq!(direct.status, StatusCode::OK);
    assert_eq!(direct.data()["total_items"], 2);

    let recursive = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&parent_path=admin&recursive=true",
            None,
        )
        .await;
    assert_eq!(recursive.data()["total_items"], 3);

    let roots = app
        .request("GET", "/v1/items/search?container_code=project&zone=0", None)
        .await;
    assert_eq!(roots.data()["total_items"], 1);
    assert_eq!(roots.data()["items"][0]["name"], "admin");

    let by_name = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&parent_path=admin.docs&name=notes.txt",
            None,
        )
        .await;
    assert_eq!(by_name.data()["total_items"], 1);
}

#[tokio::test]
async fn test_rename_cascades_to_descendants() {
    let (app, docs, report) = seeded().await;

    let response = app
        .request("PUT", &format!("/v1/item/{docs}"), Some(json!({ "name": "papers" })))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "papers");
    assert_eq!(app.get(&report).await["parent_path"], "admin.papers");
}

#[tokio::test]
async fn test_move_cascades_to_descendants() {
    let (app, docs, report) = seeded().await;
    let other = app.folder("admin", "other").await;

    let response = app
        .request(
            "PUT",
            &format!("/v1/item/{docs}"),
            Some(json!({ "parent_path": "admin.other" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["parent"], other["id"]);
    assert_eq!(response.data()["parent_path"], "admin.other");
    assert_eq!(app.get(&report).await["parent_path"], "admin.other.docs");
}

#[tokio::test]
async fn test_move_and_rename_in_one_update() {
    let (app, _, report) = seeded().await;
    app.folder("admin", "other").await;
    app.file("admin.other", "report.txt").await;

    let response = app
        .request(
            "PUT",
            &format!("/v1/item/{report}"),
            Some(json!({ "parent_path": "admin.other", "name": "renamed.txt" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["name"], "renamed.txt");
    assert_eq!(response.data()["parent_path"], "admin.other");

    let taken = app
        .request(
            "PUT",
            &format!("/v1/item/{report}"),
            Some(json!({ "parent_path": "admin.docs", "name": "renamed.txt" })),
        )
        .await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.data()["parent_path"], "admin.docs");
}

#[tokio::test]
async fn test_move_into_own_subtree_rejected() {
    let (app, docs, _) = seeded().await;
    app.folder("admin.docs", "inner").await;

    let response = app
        .request(
            "PUT",
            &format!("/v1/item/{docs}"),
            Some(json!({ "parent_path": "admin.docs.inner" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_children_grouped_by_depth() {
    let (app, _, _) = seeded().await;
    let root = app
        .request("GET", "/v1/items/search?container_code=project&zone=0", None)
        .await;
    let admin = root.data()["items"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .request("GET", &format!("/v1/item/{admin}/children"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let groups = response.data().as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["depth"], 1);
    assert_eq!(groups[0]["items"][0]["name"], "docs");
    assert_eq!(groups[1]["depth"], 2);
    assert_eq!(groups[1]["items"][0]["name"], "report.txt");
}

#[tokio::test]
async fn test_delete_removes_subtree() {
    let (app, docs, report) = seeded().await;

    let response = app
        .request("DELETE", &format!("/v1/item/{docs}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["deleted"].as_array().unwrap().len(), 2);
    let gone = app.request("GET", &format!("/v1/item/{report}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_create_update_and_delete() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;

    let created = app
        .request(
            "POST",
            "/v1/items",
            Some(json!({ "items": [
                item_body("file", Some("admin"), "a.txt"),
                item_body("file", Some("admin"), "b.txt"),
            ]})),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let ids: Vec<String> = created
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect();

    let batch = app
        .request("GET", &format!("/v1/items/batch?ids={}", ids.join(",")), None)
        .await;
    assert_eq!(batch.status, StatusCode::OK);
    assert_eq!(batch.data()["total_items"], 2);

    let mismatch = app
        .request(
            "PUT",
            "/v1/items",
            Some(json!({ "ids": ids, "items": [{ "owner": "someone" }] })),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);

    let updated = app
        .request(
            "PUT",
            "/v1/items",
            Some(json!({ "ids": ids, "items": [{ "owner": "x" }, { "owner": "y" }] })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()[1]["owner"], "y");

    let deleted = app
        .request("DELETE", "/v1/items", Some(json!({ "ids": ids })))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["deleted"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_create_rejects_duplicates_atomically() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;

    let response = app
        .request(
            "POST",
            "/v1/items",
            Some(json!({ "items": [
                item_body("file", Some("admin"), "a.txt"),
                item_body("file", Some("admin"), "a.txt"),
            ]})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let search = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&parent_path=admin",
            None,
        )
        .await;
    assert_eq!(search.data()["total_items"], 0);
}

#[tokio::test]
async fn test_bulk_create_duplicate_parent_by_id_and_path() {
    let (app, docs, _) = seeded().await;

    let mut by_id = item_body("file", None, "dup.txt");
    by_id["parent"] = json!(docs);
    let by_path = item_body("file", Some("admin.docs"), "dup.txt");

    let response = app
        .request("POST", "/v1/items", Some(json!({ "items": [by_id, by_path] })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    let search = app
        .request(
            "GET",
            "/v1/items/search?container_code=project&zone=0&parent_path=admin.docs&name=dup.txt",
            None,
        )
        .await;
    assert_eq!(search.data()["total_items"], 0);
}
