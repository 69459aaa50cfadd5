mod categories;
mod todos;
