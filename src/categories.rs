//! Category endpoints.

use crate::dto::{CategoryInput, CategoryResponse};
use crate::module::Module;
use crate::procedure::{Empty, Meta, Procedure};
use crate::router::{Context, Router};
use crate::store::{self, NewTodoRecord};
use crate::{Error, Result};

const TAG: &str = "categories";

/// Registers every `/categories` route.
pub struct Categories;

impl Module for Categories {
    fn name(&self) -> &'static str {
        TAG
    }

    fn routes(&self, router: &mut Router) {
        router.procedure::<ListCategories>();
        router.procedure::<GetCategory>();
        router.procedure::<CreateCategory>();
        router.procedure::<UpdateCategory>();
        router.procedure::<DeleteCategory>();
    }
}

pub struct ListCategories;

impl Procedure for ListCategories {
    fn meta() -> Meta {
        Meta::get("/categories")
            .summary("List categories with their todos")
            .tag(TAG)
    }

    type Input = Empty;
    type Output = Vec<CategoryResponse>;

    async fn handle(ctx: Context, _input: Empty) -> Result<Self::Output> {
        let session = ctx.session().await?;
        let categories = store::list_categories(&session).await?;
        Ok(categories
            .into_iter()
            .map(|(category, todos)| CategoryResponse::new(category, todos))
            .collect())
    }
}

pub struct GetCategory;

impl Procedure for GetCategory {
    fn meta() -> Meta {
        Meta::get("/categories/{id}")
            .summary("Get a category with its todos")
            .tag(TAG)
    }

    type Input = Empty;
    type Output = CategoryResponse;

    async fn handle(ctx: Context, _input: Empty) -> Result<CategoryResponse> {
        let id = ctx.id_param("id")?;
        let session = ctx.session().await?;
        let category = store::find_category(&session, id)
            .await?
            .ok_or(Error::NotFound)?;
        let todos = store::list_todos_in(&session, id).await?;
        Ok(CategoryResponse::new(category, todos))
    }
}

pub struct CreateCategory;

impl Procedure for CreateCategory {
    fn meta() -> Meta {
        Meta::post("/categories")
            .summary("Create a category, optionally with todos")
            .tag(TAG)
            .status(201)
    }

    type Input = CategoryInput;
    type Output = CategoryResponse;

    async fn handle(ctx: Context, input: CategoryInput) -> Result<CategoryResponse> {
        input.validate()?;
        let session = ctx.session().await?;

        let tx = session.transaction().await?;
        let category = store::insert_category(&tx, &input.name).await?;
        let mut todos = Vec::with_capacity(input.todos.len());
        for todo in &input.todos {
            let record = NewTodoRecord {
                title: &todo.title,
                content: &todo.content,
                due_date: todo.due_date,
                category_id: category.id,
            };
            let todo = store::insert_todo(&tx, record).await?.ok_or_else(|| {
                Error::Internal("Category vanished inside its transaction".to_string())
            })?;
            todos.push(todo);
        }
        tx.commit().await?;

        tracing::info!(id = category.id, todos = todos.len(), "category created");
        Ok(CategoryResponse::new(category, todos))
    }

    fn location(output: &CategoryResponse) -> Option<String> {
        Some(format!("/categories/{}", output.id))
    }
}

pub struct UpdateCategory;

impl Procedure for UpdateCategory {
    fn meta() -> Meta {
        Meta::put("/categories/{id}")
            .summary("Rename a category")
            .tag(TAG)
            .status(204)
    }

    type Input = CategoryInput;
    type Output = ();

    async fn handle(ctx: Context, input: CategoryInput) -> Result<()> {
        let id = ctx.id_param("id")?;
        if input.name.trim().is_empty() {
            return Err(Error::BadRequest("Name is required".to_string()));
        }
        let session = ctx.session().await?;
        if !store::rename_category(&session, id, &input.name).await? {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}

pub struct DeleteCategory;

impl Procedure for DeleteCategory {
    fn meta() -> Meta {
        Meta::delete("/categories/{id}")
            .summary("Delete a category that has no todos")
            .tag(TAG)
    }

    type Input = Empty;
    type Output = CategoryResponse;

    async fn handle(ctx: Context, _input: Empty) -> Result<CategoryResponse> {
        let id = ctx.id_param("id")?;
        let session = ctx.session().await?;
        let category = store::find_category(&session, id)
            .await?
            .ok_or(Error::NotFound)?;

        if !store::delete_category(&session, id).await? {
            // Todos are never removed, so a referenced category must stay.
            let referencing = store::count_todos_referencing(&session, id).await?;
            if referencing > 0 {
                return Err(Error::Conflict(format!(
                    "Category {id} still has {referencing} todo(s)"
                )));
            }
            return Err(Error::NotFound);
        }
        tracing::info!(id, "category deleted");
        Ok(CategoryResponse::new(category, Vec::new()))
    }
}
