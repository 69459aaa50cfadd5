//! `/todos` endpoint tests.

use jiff::Timestamp;
use serde_json::{Value, json};

use super::harness::spawn;

fn new_todo(title: &str, category_id: i64) -> String {
    json!({
        "title": title,
        "content": "...",
        "dueDate": "2025-01-01T00:00:00Z",
        "categoryId": category_id,
    })
    .to_string()
}

#[tokio::test]
async fn lifecycle_create_delete_then_gone() {
    let app = spawn().await;

    let category = app.post("/categories", r#"{"name":"Work"}"#).await;
    assert_eq!(category.status, 201);
    let category: Value = category.json();
    assert_eq!(category["id"], 1);
    assert_eq!(category["name"], "Work");

    let created = app
        .post(
            "/todos",
            r#"{"title":"Write report","content":"...","dueDate":"2025-01-01T00:00:00Z","categoryId":1}"#,
        )
        .await;
    assert_eq!(created.status, 201);
    assert_eq!(created.header("location").as_deref(), Some("/todos/1"));
    let todo: Value = created.json();
    assert_eq!(todo["isCompleted"], false);
    assert_eq!(todo["category"], json!({ "id": 1, "name": "Work" }));

    let deleted = app.delete("/todos/1").await;
    assert_eq!(deleted.status, 200);
    assert_eq!(deleted.json::<Value>()["isDeleted"], true);

    assert_eq!(app.get("/todos/1").await.status, 404);
    let list = app.get("/todos").await;
    assert_eq!(list.status, 200);
    assert_eq!(list.json::<Value>(), json!([]));

    app.shutdown().await;
}

#[tokio::test]
async fn create_with_unknown_category_is_rejected() {
    let app = spawn().await;

    let reply = app.post("/todos", &new_todo("Orphan", 5)).await;
    let stored = app.stored_todo_count().await;
    app.shutdown().await;

    assert_eq!(reply.status, 400);
    assert_eq!(reply.json::<Value>()["error"], "Category not found");
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn create_ignores_caller_supplied_server_fields() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let body = json!({
        "title": "Sneaky",
        "content": "tries to preset flags",
        "dueDate": "2025-06-01T12:00:00Z",
        "categoryId": work,
        "isCompleted": true,
        "isDeleted": true,
        "createdAt": "1999-12-31T23:59:59Z",
    });

    let before = Timestamp::now();
    let reply = app.post("/todos", &body.to_string()).await;
    let after = Timestamp::now();
    assert_eq!(reply.status, 201);
    let todo: Value = reply.json();
    let stored = app.stored_todo(todo["id"].as_i64().unwrap()).await.unwrap();
    app.shutdown().await;

    assert_eq!(todo["isCompleted"], false);
    assert_eq!(todo["isDeleted"], false);
    assert_eq!(todo["dueDate"], "2025-06-01T12:00:00Z");
    let created_at: Timestamp = todo["createdAt"].as_str().unwrap().parse().unwrap();
    assert!(before <= created_at && created_at <= after, "{created_at} outside [{before}, {after}]");
    assert!(!stored.is_completed);
    assert!(!stored.is_deleted);
}

#[tokio::test]
async fn create_validates_title() {
    let app = spawn().await;
    let work = app.category("Work").await;

    let too_long = app.post("/todos", &new_todo(&"t".repeat(101), work)).await;
    let at_limit = app.post("/todos", &new_todo(&"t".repeat(100), work)).await;
    let missing = app
        .post(
            "/todos",
            &json!({ "content": "c", "dueDate": "2025-01-01T00:00:00Z", "categoryId": work })
                .to_string(),
        )
        .await;
    app.shutdown().await;

    assert_eq!(too_long.status, 400);
    assert_eq!(at_limit.status, 201);
    assert_eq!(missing.status, 400);
}

#[tokio::test]
async fn list_and_get_nest_minimal_category() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let first = app.todo("First", work).await;
    app.todo("Second", work).await;

    let list: Value = app.get("/todos").await.json();
    let one = app.get(&format!("/todos/{first}")).await;
    app.shutdown().await;

    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["title"], "First");
    assert_eq!(list[1]["title"], "Second");
    assert_eq!(list[0]["category"], json!({ "id": work, "name": "Work" }));

    assert_eq!(one.status, 200);
    let one: Value = one.json();
    assert_eq!(one["id"], first);
    assert!(one["category"].get("todos").is_none());
}

#[tokio::test]
async fn list_never_includes_deleted_todos() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        ids.push(app.todo(title, work).await);
    }
    for id in [ids[0], ids[2]] {
        assert_eq!(app.delete(&format!("/todos/{id}")).await.status, 200);
    }

    let list: Value = app.get("/todos").await.json();
    app.shutdown().await;

    let listed: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            assert_eq!(t["isDeleted"], false);
            t["id"].as_i64().unwrap()
        })
        .collect();
    assert_eq!(listed, vec![ids[1], ids[3]]);
}

#[tokio::test]
async fn delete_is_soft_and_not_repeatable() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Ephemeral", work).await;

    let first = app.delete(&format!("/todos/{id}")).await;
    let second = app.delete(&format!("/todos/{id}")).await;
    let get = app.get(&format!("/todos/{id}")).await;
    let stored = app.stored_todo(id).await;
    app.shutdown().await;

    assert_eq!(first.status, 200);
    assert_eq!(second.status, 404);
    assert_eq!(get.status, 404);
    let stored = stored.expect("row was physically removed");
    assert!(stored.is_deleted);
    assert_eq!(stored.title, "Ephemeral");
}

#[tokio::test]
async fn delete_missing_todo_returns_404() {
    let app = spawn().await;

    let reply = app.delete("/todos/31").await;
    app.shutdown().await;

    assert_eq!(reply.status, 404);
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn patch_updates_fields_and_keeps_created_at() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Draft", work).await;
    let created_at = app.stored_todo(id).await.unwrap().created_at;

    let reply = app
        .patch(
            &format!("/todos/{id}"),
            r#"{"title":"Final","content":"Done","isCompleted":true,"dueDate":"2025-09-09T09:00:00Z"}"#,
        )
        .await;
    let todo: Value = app.get(&format!("/todos/{id}")).await.json();
    let stored = app.stored_todo(id).await.unwrap();
    app.shutdown().await;

    assert_eq!(reply.status, 204);
    assert!(reply.body.is_empty());
    assert_eq!(todo["title"], "Final");
    assert_eq!(todo["content"], "Done");
    assert_eq!(todo["isCompleted"], true);
    assert_eq!(todo["dueDate"], "2025-09-09T09:00:00Z");
    assert_eq!(todo["categoryId"], work);
    assert_eq!(stored.created_at, created_at);
}

#[tokio::test]
async fn patch_category_zero_keeps_category() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Stay", work).await;

    let reply = app
        .patch(&format!("/todos/{id}"), r#"{"categoryId":0,"title":"Stayed"}"#)
        .await;
    let stored = app.stored_todo(id).await.unwrap();
    app.shutdown().await;

    assert_eq!(reply.status, 204);
    assert_eq!(stored.category_id, work);
    assert_eq!(stored.title, "Stayed");
}

#[tokio::test]
async fn patch_valid_category_moves_todo() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let home = app.category("Home").await;
    let id = app.todo("Move", work).await;

    let reply = app
        .patch(&format!("/todos/{id}"), &json!({ "categoryId": home }).to_string())
        .await;
    let todo: Value = app.get(&format!("/todos/{id}")).await.json();
    app.shutdown().await;

    assert_eq!(reply.status, 204);
    assert_eq!(todo["categoryId"], home);
    assert_eq!(todo["category"]["name"], "Home");
}

#[tokio::test]
async fn patch_unknown_category_leaves_row_unmodified() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Untouched", work).await;

    let reply = app
        .patch(
            &format!("/todos/{id}"),
            r#"{"categoryId":404,"title":"Touched","isCompleted":true}"#,
        )
        .await;
    let stored = app.stored_todo(id).await.unwrap();
    app.shutdown().await;

    assert_eq!(reply.status, 400);
    assert_eq!(reply.json::<Value>()["error"], "Category not found");
    assert_eq!(stored.category_id, work);
    assert_eq!(stored.title, "Untouched");
    assert!(!stored.is_completed);
}

#[tokio::test]
async fn patch_missing_or_deleted_todo_returns_404() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Gone", work).await;
    assert_eq!(app.delete(&format!("/todos/{id}")).await.status, 200);

    let deleted = app
        .patch(&format!("/todos/{id}"), r#"{"title":"Revived"}"#)
        .await;
    let missing = app.patch("/todos/999", r#"{"title":"Nobody"}"#).await;
    let stored = app.stored_todo(id).await.unwrap();
    app.shutdown().await;

    assert_eq!(deleted.status, 404);
    assert_eq!(missing.status, 404);
    assert_eq!(stored.title, "Gone");
}

#[tokio::test]
async fn patch_rejects_oversized_title() {
    let app = spawn().await;
    let work = app.category("Work").await;
    let id = app.todo("Short", work).await;

    let reply = app
        .patch(
            &format!("/todos/{id}"),
            &json!({ "title": "y".repeat(101) }).to_string(),
        )
        .await;
    app.shutdown().await;

    assert_eq!(reply.status, 400);
}
