//! `/categories` endpoint tests.

use serde_json::{Value, json};

use super::harness::spawn;

#[tokio::test]
async fn list_categories_empty() {
    let app = spawn().await;

    let reply = app.get("/categories").await;
    app.shutdown().await;

    assert_eq!(reply.status, 200);
    assert_eq!(reply.json::<Value>(), json!([]));
}

#[tokio::test]
async fn create_category_returns_201_with_location() {
    let app = spawn().await;

    let reply = app.post("/categories", r#"{"name":"Work"}"#).await;
    app.shutdown().await;

    assert_eq!(reply.status, 201);
    let body: Value = reply.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Work");
    assert_eq!(body["todos"], json!([]));
    assert_eq!(reply.header("location").as_deref(), Some("/categories/1"));
}

#[tokio::test]
async fn create_category_with_todos() {
    let app = spawn().await;

    let reply = app
        .post(
            "/categories",
            r#"{"name":"Errands","todos":[
                {"title":"Post office","content":"Send parcel","dueDate":"2025-05-01T10:00:00Z"},
                {"title":"Bank","content":"Deposit","dueDate":"2025-05-02T10:00:00Z","isCompleted":true}
            ]}"#,
        )
        .await;
    assert_eq!(reply.status, 201, "{}", reply.body);
    let created: Value = reply.json();
    let id = created["id"].as_i64().unwrap();

    let fetched: Value = app.get(&format!("/categories/{id}")).await.json();
    app.shutdown().await;

    let todos = fetched["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["title"], "Post office");
    assert_eq!(todos[0]["categoryId"], id);
    assert_eq!(todos[1]["isCompleted"], false);
    assert!(todos[0].get("category").is_none());
}

#[tokio::test]
async fn create_category_with_invalid_todo_persists_nothing() {
    let app = spawn().await;
    let long_title = "x".repeat(101);
    let body = json!({
        "name": "Errands",
        "todos": [{ "title": long_title, "content": "c", "dueDate": "2025-05-01T10:00:00Z" }],
    });

    let reply = app.post("/categories", &body.to_string()).await;
    let list: Value = app.get("/categories").await.json();
    app.shutdown().await;

    assert_eq!(reply.status, 400);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_category_requires_name() {
    let app = spawn().await;

    let missing = app.post("/categories", r#"{}"#).await;
    let blank = app.post("/categories", r#"{"name":"   "}"#).await;
    let malformed = app.post("/categories", r#"{"name":"#).await;
    app.shutdown().await;

    assert_eq!(missing.status, 400);
    assert_eq!(blank.status, 400);
    assert_eq!(malformed.status, 400);
    assert!(missing.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn get_category_not_found_has_empty_body() {
    let app = spawn().await;

    let reply = app.get("/categories/42").await;
    app.shutdown().await;

    assert_eq!(reply.status, 404);
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn get_category_with_malformed_id_is_bad_request() {
    let app = spawn().await;

    let reply = app.get("/categories/abc").await;
    app.shutdown().await;

    assert_eq!(reply.status, 400);
}

#[tokio::test]
async fn category_views_exclude_soft_deleted_todos() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let kept = app.todo("Keep me", work).await;
    let dropped = app.todo("Drop me", work).await;
    assert_eq!(app.delete(&format!("/todos/{dropped}")).await.status, 200);

    let one: Value = app.get(&format!("/categories/{work}")).await.json();
    let all: Value = app.get("/categories").await.json();
    app.shutdown().await;

    assert_eq!(one["todos"].as_array().unwrap().len(), 1);
    assert_eq!(one["todos"][0]["id"], kept);
    assert_eq!(all[0]["todos"].as_array().unwrap().len(), 1);
    assert_eq!(all[0]["todos"][0]["id"], kept);
}

#[tokio::test]
async fn update_category_renames() {
    let app = spawn().await;
    let id = app.category("Work").await;

    let reply = app
        .put(&format!("/categories/{id}"), r#"{"name":"Office"}"#)
        .await;
    let fetched: Value = app.get(&format!("/categories/{id}")).await.json();
    app.shutdown().await;

    assert_eq!(reply.status, 204);
    assert!(reply.body.is_empty());
    assert_eq!(fetched["name"], "Office");
}

#[tokio::test]
async fn update_missing_category_returns_404() {
    let app = spawn().await;

    let reply = app.put("/categories/999", r#"{"name":"Ghost"}"#).await;
    app.shutdown().await;

    assert_eq!(reply.status, 404);
}

#[tokio::test]
async fn delete_category_returns_removed_record() {
    let app = spawn().await;
    let id = app.category("Someday").await;

    let reply = app.delete(&format!("/categories/{id}")).await;
    let after = app.get(&format!("/categories/{id}")).await;
    app.shutdown().await;

    assert_eq!(reply.status, 200);
    let removed: Value = reply.json();
    assert_eq!(removed["id"], id);
    assert_eq!(removed["name"], "Someday");
    assert_eq!(after.status, 404);
}

#[tokio::test]
async fn delete_missing_category_returns_404() {
    let app = spawn().await;

    let reply = app.delete("/categories/7").await;
    app.shutdown().await;

    assert_eq!(reply.status, 404);
}

#[tokio::test]
async fn delete_category_with_todos_is_refused() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let todo = app.todo("Report", work).await;

    let with_live = app.delete(&format!("/categories/{work}")).await;

    // Soft-deleted todos still hold the category
    assert_eq!(app.delete(&format!("/todos/{todo}")).await.status, 200);
    let with_deleted = app.delete(&format!("/categories/{work}")).await;
    let still_there = app.get(&format!("/categories/{work}")).await;
    app.shutdown().await;

    assert_eq!(with_live.status, 409);
    assert!(with_live.json::<Value>()["error"].is_string());
    assert_eq!(with_deleted.status, 409);
    assert_eq!(still_there.status, 200);
}
