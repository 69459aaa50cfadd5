//! Transfer shapes: what goes over the wire.
//!
//! Categories and todos reference each other in storage, but payloads never
//! do. A category carries a flat list of [`TodoSummary`] values, and a todo
//! carries a [`CategoryRef`] without the category's own todo list.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entity::{Category, Todo};
use crate::{Error, Result};

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Request body for creating or renaming a category.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    /// Todos created together with the category. Ignored on rename.
    #[serde(default)]
    pub todos: Vec<NewTodo>,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest("Name is required".to_string()));
        }
        self.todos
            .iter()
            .try_for_each(|todo| validate_title(&todo.title))
    }
}

/// A todo attached to a category created in the same request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub content: String,
    #[schemars(with = "String")]
    pub due_date: Timestamp,
}

/// Request body for creating a todo.
///
/// Completion, deletion and creation time are server-controlled; any values
/// the caller sends for them are ignored.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub title: String,
    pub content: String,
    #[schemars(with = "String")]
    pub due_date: Timestamp,
    pub category_id: i64,
}

impl TodoInput {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// Request body for a partial todo update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_completed: Option<bool>,
    #[schemars(with = "Option<String>")]
    pub due_date: Option<Timestamp>,
    /// `0` is treated like an absent value.
    pub category_id: Option<i64>,
}

impl TodoPatch {
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// The category to move the todo to, if the patch asks for a move.
    pub fn new_category_id(&self) -> Option<i64> {
        self.category_id.filter(|&id| id != 0)
    }

    /// Apply the supplied fields to a stored todo.
    pub fn apply(self, todo: &mut Todo) {
        if let Some(category_id) = self.new_category_id() {
            todo.category_id = category_id;
        }
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(content) = self.content {
            todo.content = content;
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::BadRequest("Title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(Error::BadRequest(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// A todo without its category, as nested inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_deleted: bool,
    pub is_completed: bool,
    #[schemars(with = "String")]
    pub created_at: Timestamp,
    #[schemars(with = "String")]
    pub due_date: Timestamp,
    pub category_id: i64,
}

impl From<Todo> for TodoSummary {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            content: todo.content,
            is_deleted: todo.is_deleted,
            is_completed: todo.is_completed,
            created_at: todo.created_at,
            due_date: todo.due_date,
            category_id: todo.category_id,
        }
    }
}

/// Minimal category nested inside a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// A todo together with its minimal category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    #[serde(flatten)]
    pub todo: TodoSummary,
    pub category: CategoryRef,
}

impl TodoResponse {
    pub fn new(todo: Todo, category: Category) -> Self {
        Self {
            todo: todo.into(),
            category: category.into(),
        }
    }
}

/// A category together with its todos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub todos: Vec<TodoSummary>,
}

impl CategoryResponse {
    pub fn new(category: Category, todos: Vec<Todo>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            todos: todos.into_iter().map(TodoSummary::from).collect(),
        }
    }
}
