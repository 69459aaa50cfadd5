//! Storage operations.
//!
//! Every function takes a connection rather than a [`crate::db::Session`] so
//! the same statements run inside a transaction. Soft-deleted todos are
//! filtered here; callers never see them.

use std::collections::HashMap;

use jiff::Timestamp;

use crate::Result;
use crate::db::{DbConnection, Row, params};
use crate::entity::{Category, Todo};

const TODO_WITH_CATEGORY: &str = "
    SELECT t.id, t.title, t.content, t.is_deleted, t.is_completed,
           t.created_at, t.due_date, t.category_id, c.id, c.name
    FROM todos t
    JOIN categories c ON c.id = t.category_id";

fn todo_with_category(row: &Row) -> Result<(Todo, Category)> {
    let todo = Todo::from_row(row)?;
    let category = Category {
        id: row.get(8)?,
        name: row.get(9)?,
    };
    Ok((todo, category))
}

// Categories

/// All categories, each with its live todos, ordered by id.
pub async fn list_categories(conn: &DbConnection) -> Result<Vec<(Category, Vec<Todo>)>> {
    let sql = format!("SELECT {} FROM categories ORDER BY id", Category::COLUMNS);
    let mut rows = conn.query(&sql, ()).await?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next().await? {
        categories.push(Category::from_row(&row)?);
    }

    let mut by_category: HashMap<i64, Vec<Todo>> = HashMap::new();
    for todo in list_todos(conn).await? {
        by_category.entry(todo.category_id).or_default().push(todo);
    }

    Ok(categories
        .into_iter()
        .map(|category| {
            let todos = by_category.remove(&category.id).unwrap_or_default();
            (category, todos)
        })
        .collect())
}

pub async fn find_category(conn: &DbConnection, id: i64) -> Result<Option<Category>> {
    let sql = format!("SELECT {} FROM categories WHERE id = ?1", Category::COLUMNS);
    let mut rows = conn.query(&sql, params![id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(Category::from_row(&row)?)),
        None => Ok(None),
    }
}

pub async fn category_exists(conn: &DbConnection, id: i64) -> Result<bool> {
    let mut rows = conn
        .query("SELECT 1 FROM categories WHERE id = ?1", params![id])
        .await?;
    Ok(rows.next().await?.is_some())
}

pub async fn insert_category(conn: &DbConnection, name: &str) -> Result<Category> {
    conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
        .await?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Returns `false` when no category has this id.
pub async fn rename_category(conn: &DbConnection, id: i64, name: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .await?;
    Ok(changed > 0)
}

/// Physically removes the category row unless a todo, deleted or not, still
/// references it. Returns `false` when nothing was removed.
pub async fn delete_category(conn: &DbConnection, id: i64) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM categories
             WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM todos WHERE category_id = ?1)",
            params![id],
        )
        .await?;
    Ok(changed > 0)
}

/// Number of todo rows referencing a category, soft-deleted rows included.
pub async fn count_todos_referencing(conn: &DbConnection, category_id: i64) -> Result<i64> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM todos WHERE category_id = ?1",
            params![category_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(0),
    }
}

// Todos

/// Live todos, ordered by id.
pub async fn list_todos(conn: &DbConnection) -> Result<Vec<Todo>> {
    let sql = format!(
        "SELECT {} FROM todos WHERE is_deleted = 0 ORDER BY id",
        Todo::COLUMNS
    );
    let mut rows = conn.query(&sql, ()).await?;
    let mut todos = Vec::new();
    while let Some(row) = rows.next().await? {
        todos.push(Todo::from_row(&row)?);
    }
    Ok(todos)
}

/// Live todos in a category, ordered by id.
pub async fn list_todos_in(conn: &DbConnection, category_id: i64) -> Result<Vec<Todo>> {
    let sql = format!(
        "SELECT {} FROM todos WHERE category_id = ?1 AND is_deleted = 0 ORDER BY id",
        Todo::COLUMNS
    );
    let mut rows = conn.query(&sql, params![category_id]).await?;
    let mut todos = Vec::new();
    while let Some(row) = rows.next().await? {
        todos.push(Todo::from_row(&row)?);
    }
    Ok(todos)
}

/// Live todos joined with their category, ordered by id.
pub async fn list_todos_with_category(conn: &DbConnection) -> Result<Vec<(Todo, Category)>> {
    let sql = format!("{TODO_WITH_CATEGORY} WHERE t.is_deleted = 0 ORDER BY t.id");
    let mut rows = conn.query(&sql, ()).await?;
    let mut todos = Vec::new();
    while let Some(row) = rows.next().await? {
        todos.push(todo_with_category(&row)?);
    }
    Ok(todos)
}

/// A live todo joined with its category.
pub async fn find_todo_with_category(
    conn: &DbConnection,
    id: i64,
) -> Result<Option<(Todo, Category)>> {
    let sql = format!("{TODO_WITH_CATEGORY} WHERE t.id = ?1 AND t.is_deleted = 0");
    let mut rows = conn.query(&sql, params![id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(todo_with_category(&row)?)),
        None => Ok(None),
    }
}

/// A live todo.
pub async fn find_todo(conn: &DbConnection, id: i64) -> Result<Option<Todo>> {
    let sql = format!(
        "SELECT {} FROM todos WHERE id = ?1 AND is_deleted = 0",
        Todo::COLUMNS
    );
    let mut rows = conn.query(&sql, params![id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(Todo::from_row(&row)?)),
        None => Ok(None),
    }
}

/// Fields a caller may choose when creating a todo.
pub struct NewTodoRecord<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub due_date: Timestamp,
    pub category_id: i64,
}

/// Insert a todo stamped with the current time, not completed and not deleted.
///
/// Returns `None` when the category does not exist at the moment of the write.
pub async fn insert_todo(conn: &DbConnection, record: NewTodoRecord<'_>) -> Result<Option<Todo>> {
    let created_at = Timestamp::now();
    let changed = conn
        .execute(
            "INSERT INTO todos (title, content, is_deleted, is_completed, created_at, due_date, category_id)
             SELECT ?1, ?2, 0, 0, ?3, ?4, id FROM categories WHERE id = ?5",
            params![
                record.title,
                record.content,
                created_at.to_string(),
                record.due_date.to_string(),
                record.category_id
            ],
        )
        .await?;
    if changed == 0 {
        return Ok(None);
    }

    Ok(Some(Todo {
        id: conn.last_insert_rowid(),
        title: record.title.to_string(),
        content: record.content.to_string(),
        is_deleted: false,
        is_completed: false,
        created_at,
        due_date: record.due_date,
        category_id: record.category_id,
    }))
}

/// Write back the mutable fields of a live todo. `created_at` is never written.
///
/// Returns `false` when the todo is missing or deleted, or its category is gone.
pub async fn update_todo(conn: &DbConnection, todo: &Todo) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE todos
             SET title = ?1, content = ?2, is_completed = ?3, due_date = ?4, category_id = ?5
             WHERE id = ?6 AND is_deleted = 0
               AND EXISTS (SELECT 1 FROM categories WHERE id = ?5)",
            params![
                todo.title.as_str(),
                todo.content.as_str(),
                i64::from(todo.is_completed),
                todo.due_date.to_string(),
                todo.category_id,
                todo.id
            ],
        )
        .await?;
    Ok(changed > 0)
}

/// Mark a live todo as deleted. Returns `false` if it was missing or already deleted.
pub async fn soft_delete_todo(conn: &DbConnection, id: i64) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE todos SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0",
            params![id],
        )
        .await?;
    Ok(changed > 0)
}
