//! Todo endpoints.
//!
//! A soft-deleted todo behaves as if it did not exist: it is not listed,
//! cannot be fetched or updated, and deleting it again is not-found.

use crate::dto::{TodoInput, TodoPatch, TodoResponse};
use crate::module::Module;
use crate::procedure::{Empty, Meta, Procedure};
use crate::router::{Context, Router};
use crate::store::{self, NewTodoRecord};
use crate::{Error, Result};

const TAG: &str = "todos";

/// Registers every `/todos` route.
pub struct Todos;

impl Module for Todos {
    fn name(&self) -> &'static str {
        TAG
    }

    fn routes(&self, router: &mut Router) {
        router.procedure::<ListTodos>();
        router.procedure::<GetTodo>();
        router.procedure::<CreateTodo>();
        router.procedure::<UpdateTodo>();
        router.procedure::<DeleteTodo>();
    }
}

fn category_not_found() -> Error {
    Error::BadRequest("Category not found".to_string())
}

pub struct ListTodos;

impl Procedure for ListTodos {
    fn meta() -> Meta {
        Meta::get("/todos").summary("List todos").tag(TAG)
    }

    type Input = Empty;
    type Output = Vec<TodoResponse>;

    async fn handle(ctx: Context, _input: Empty) -> Result<Self::Output> {
        let session = ctx.session().await?;
        let todos = store::list_todos_with_category(&session).await?;
        Ok(todos
            .into_iter()
            .map(|(todo, category)| TodoResponse::new(todo, category))
            .collect())
    }
}

pub struct GetTodo;

impl Procedure for GetTodo {
    fn meta() -> Meta {
        Meta::get("/todos/{id}").summary("Get a todo").tag(TAG)
    }

    type Input = Empty;
    type Output = TodoResponse;

    async fn handle(ctx: Context, _input: Empty) -> Result<TodoResponse> {
        let id = ctx.id_param("id")?;
        let session = ctx.session().await?;
        let (todo, category) = store::find_todo_with_category(&session, id)
            .await?
            .ok_or(Error::NotFound)?;
        Ok(TodoResponse::new(todo, category))
    }
}

pub struct CreateTodo;

impl Procedure for CreateTodo {
    fn meta() -> Meta {
        Meta::post("/todos")
            .summary("Create a todo")
            .tag(TAG)
            .status(201)
    }

    type Input = TodoInput;
    type Output = TodoResponse;

    async fn handle(ctx: Context, input: TodoInput) -> Result<TodoResponse> {
        input.validate()?;
        let session = ctx.session().await?;
        let category = store::find_category(&session, input.category_id)
            .await?
            .ok_or_else(category_not_found)?;

        let record = NewTodoRecord {
            title: &input.title,
            content: &input.content,
            due_date: input.due_date,
            category_id: category.id,
        };
        let todo = store::insert_todo(&session, record)
            .await?
            .ok_or_else(category_not_found)?;

        tracing::info!(id = todo.id, category_id = category.id, "todo created");
        Ok(TodoResponse::new(todo, category))
    }

    fn location(output: &TodoResponse) -> Option<String> {
        Some(format!("/todos/{}", output.todo.id))
    }
}

pub struct UpdateTodo;

impl Procedure for UpdateTodo {
    fn meta() -> Meta {
        Meta::patch("/todos/{id}")
            .summary("Update fields of a todo")
            .tag(TAG)
            .status(204)
    }

    type Input = TodoPatch;
    type Output = ();

    async fn handle(ctx: Context, patch: TodoPatch) -> Result<()> {
        let id = ctx.id_param("id")?;
        let session = ctx.session().await?;
        let mut todo = store::find_todo(&session, id)
            .await?
            .ok_or(Error::NotFound)?;

        patch.validate()?;
        if let Some(category_id) = patch.new_category_id()
            && !store::category_exists(&session, category_id).await?
        {
            return Err(category_not_found());
        }

        patch.apply(&mut todo);
        if !store::update_todo(&session, &todo).await? {
            // the todo or its target category changed since the lookups
            if store::find_todo(&session, id).await?.is_none() {
                return Err(Error::NotFound);
            }
            return Err(category_not_found());
        }
        Ok(())
    }
}

pub struct DeleteTodo;

impl Procedure for DeleteTodo {
    fn meta() -> Meta {
        Meta::delete("/todos/{id}").summary("Soft-delete a todo").tag(TAG)
    }

    type Input = Empty;
    type Output = TodoResponse;

    async fn handle(ctx: Context, _input: Empty) -> Result<TodoResponse> {
        let id = ctx.id_param("id")?;
        let session = ctx.session().await?;
        let (mut todo, category) = store::find_todo_with_category(&session, id)
            .await?
            .ok_or(Error::NotFound)?;

        if !store::soft_delete_todo(&session, id).await? {
            return Err(Error::NotFound);
        }
        todo.is_deleted = true;

        tracing::info!(id, "todo soft-deleted");
        Ok(TodoResponse::new(todo, category))
    }
}
