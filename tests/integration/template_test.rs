//! Integration tests for attribute templates and bequeathing.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::{TestApp, id_of, item_body};

fn paint_template() -> Value {
    json!({
        "name": "paint",
        "project_code": "project",
        "attributes": [
            { "name": "colour", "optional": false, "type": "multiple_choice", "options": ["red", "blue"] },
            { "name": "note", "optional": true, "type": "text" }
        ]
    })
}

async fn create_template(app: &TestApp) -> String {
    let response = app.request("POST", "/v1/template", Some(paint_template())).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    id_of(response.data())
}

#[tokio::test]
async fn test_template_crud() {
    let app = TestApp::new().await;
    let id = create_template(&app).await;

    let fetched = app.request("GET", &format!("/v1/template/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data()["name"], "paint");
    assert_eq!(fetched.data()["attributes"][0]["type"], "multiple_choice");

    let listed = app
        .request("GET", "/v1/template?project_code=project", None)
        .await;
    assert_eq!(listed.data()["total_items"], 1);

    let mut renamed = paint_template();
    renamed["name"] = json!("lacquer");
    let updated = app
        .request("PUT", &format!("/v1/template/{id}"), Some(renamed))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["name"], "lacquer");

    let deleted = app.request("DELETE", &format!("/v1/template/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let missing = app.request("GET", &format!("/v1/template/{id}"), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_template_validation() {
    let app = TestApp::new().await;

    let mut unnamed = paint_template();
    unnamed["name"] = json!("");
    let response = app.request("POST", "/v1/template", Some(unnamed)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let mut bad_type = paint_template();
    bad_type["attributes"][0]["type"] = json!("number");
    let response = app.request("POST", "/v1/template", Some(bad_type)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut duplicate = paint_template();
    duplicate["attributes"][1]["name"] = json!("colour");
    let response = app.request("POST", "/v1/template", Some(duplicate)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_attributes_checked_against_template() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let template = create_template(&app).await;

    let mut valid = item_body("file", Some("admin"), "a.txt");
    valid["attribute_template_id"] = json!(template);
    valid["attributes"] = json!({ "colour": "red" });
    let created = app.create(valid).await;
    assert_eq!(created["extended"]["attributes"][&template]["colour"], "red");

    let mut wrong_option = item_body("file", Some("admin"), "b.txt");
    wrong_option["attribute_template_id"] = json!(template);
    wrong_option["attributes"] = json!({ "colour": "green" });
    let response = app.request("POST", "/v1/item", Some(wrong_option)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Attributes do not match attribute template");

    let mut missing_required = item_body("file", Some("admin"), "c.txt");
    missing_required["attribute_template_id"] = json!(template);
    missing_required["attributes"] = json!({ "note": "x" });
    let response = app.request("POST", "/v1/item", Some(missing_required)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut unknown = item_body("file", Some("admin"), "d.txt");
    unknown["attribute_template_id"] = json!("00000000-0000-0000-0000-000000000001");
    unknown["attributes"] = json!({ "colour": "red" });
    let response = app.request("POST", "/v1/item", Some(unknown)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    for name in ["b.txt", "c.txt", "d.txt"] {
        let search = app
            .request(
                "GET",
                &format!("/v1/items/search?container_code=project&zone=0&parent_path=admin&name={name}"),
                None,
            )
            .await;
        assert_eq!(search.data()["total_items"], 0, "{name} was persisted");
    }
}

#[tokio::test]
async fn test_bequeath_to_descendants() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let template = create_template(&app).await;
    let docs = id_of(&app.folder("admin", "docs").await);
    app.folder("admin.docs", "inner").await;
    let deep = id_of(&app.file("admin.docs.inner", "deep.txt").await);

    let response = app
        .request(
            "PUT",
            &format!("/v1/item/{docs}/bequeath"),
            Some(json!({
                "attribute_template_id": template,
                "attributes": { "colour": "blue" },
                "system_tags": ["copied-to-core"]
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data().as_array().unwrap().len(), 2);
    let file = app.get(&deep).await;
    assert_eq!(file["extended"]["attributes"][&template]["colour"], "blue");
    assert_eq!(file["extended"]["system_tags"], json!(["copied-to-core"]));
}

#[tokio::test]
async fn test_bequeath_rejections() {
    let app = TestApp::new().await;
    app.name_folder("admin").await;
    let template = create_template(&app).await;
    let docs = id_of(&app.folder("admin", "docs").await);
    let file = id_of(&app.file("admin.docs", "a.txt").await);

    let on_file = app
        .request(
            "PUT",
            &format!("/v1/item/{file}/bequeath"),
            Some(json!({ "system_tags": ["x"] })),
        )
        .await;
    assert_eq!(on_file.status, StatusCode::BAD_REQUEST);
    assert_eq!(on_file.error_code(), "INVALID_OPERATION");

    let mismatch = app
        .request(
            "PUT",
            &format!("/v1/item/{docs}/bequeath"),
            Some(json!({ "attribute_template_id": template, "attributes": { "colour": "green" } })),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);
    assert_eq!(mismatch.error_code(), "VALIDATION_ERROR");

    let empty = app
        .request("PUT", &format!("/v1/item/{docs}/bequeath"), Some(json!({})))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let untouched = app.get(&file).await;
    assert_eq!(untouched["extended"]["attributes"], json!({}));
}
