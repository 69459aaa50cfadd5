//! Stored records, one per table row.
//!
//! These never go over the wire directly; see [`crate::dto`] for the
//! transfer shapes built from them.

use jiff::Timestamp;

use crate::db::Row;

/// A row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    /// Column list matching [`Category::from_row`].
    pub const COLUMNS: &'static str = "id, name";

    pub fn from_row(row: &Row) -> crate::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// A row of the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_deleted: bool,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub due_date: Timestamp,
    pub category_id: i64,
}

impl Todo {
    /// Column list matching [`Todo::from_row`].
    pub const COLUMNS: &'static str =
        "id, title, content, is_deleted, is_completed, created_at, due_date, category_id";

    pub fn from_row(row: &Row) -> crate::Result<Self> {
        let created_at: String = row.get(5)?;
        let due_date: String = row.get(6)?;

        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            is_deleted: row.get::<i64>(3)? != 0,
            is_completed: row.get::<i64>(4)? != 0,
            created_at: created_at.parse()?,
            due_date: due_date.parse()?,
            category_id: row.get(7)?,
        })
    }
}
