//! Database connection, schema migration and per-request sessions.
//!
//! Supports multiple backends:
//! - Local SQLite file: `path/to/db.sqlite` or `file:path` or `sqlite://path`
//! - Remote Turso: `libsql://...` or `https://...` (requires TURSO_AUTH_TOKEN env var)
//!
//! In-memory databases are rejected: every request opens its own session,
//! and each in-memory connection would see a separate, empty database.

use std::ops::Deref;
use std::sync::Arc;

use libsql::{Builder, Connection, Database};

/// Shared database handle held by the server.
pub type Handle = Arc<Database>;

/// Schema version recorded in `PRAGMA user_version` after migration.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todos (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL CHECK (length(title) <= 100),
    content      TEXT NOT NULL,
    is_deleted   INTEGER NOT NULL DEFAULT 0,
    is_completed INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    due_date     TEXT NOT NULL,
    category_id  INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_todos_category_id ON todos(category_id);
CREATE INDEX IF NOT EXISTS idx_todos_is_deleted ON todos(is_deleted);
";

/// Connect to the database.
///
/// # URL formats
/// - Local file: `mydata.db`, `file:path/to/db.sqlite`, `sqlite://path`
/// - Remote Turso: `libsql://your-db.turso.io` (requires `TURSO_AUTH_TOKEN` env var)
pub async fn connect(url: &str) -> crate::Result<Database> {
    let db = if url.starts_with("libsql://") || url.starts_with("https://") {
        let token = std::env::var("TURSO_AUTH_TOKEN").map_err(|_| {
            crate::Error::Config("TURSO_AUTH_TOKEN not set for remote database".into())
        })?;
        Builder::new_remote(url.to_string(), token).build().await?
    } else if url == ":memory:" || url.contains("mode=memory") {
        return Err(crate::Error::Config(
            "in-memory databases are not supported, use a file path".into(),
        ));
    } else {
        // Local file - strip sqlite:// or file: prefix if present
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("file:"))
            .unwrap_or(url);
        Builder::new_local(path).build().await?
    };

    Ok(db)
}

/// Bring the schema up to [`SCHEMA_VERSION`].
pub async fn migrate(db: &Database) -> crate::Result<()> {
    let conn = db.connect()?;
    let version = user_version(&conn).await?;

    if version > SCHEMA_VERSION {
        return Err(crate::Error::Config(format!(
            "database version ({version}) is newer than supported schema ({SCHEMA_VERSION})"
        )));
    }
    if version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction().await?;
    tx.execute_batch(SCHEMA_V1).await?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .await?;
    tx.commit().await?;

    tracing::info!(from = version, to = SCHEMA_VERSION, "database schema migrated");
    Ok(())
}

async fn user_version(conn: &Connection) -> crate::Result<i64> {
    let mut rows = conn.query("PRAGMA user_version", ()).await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}

/// A storage session scoped to a single request.
///
/// Opened by the handler that needs storage and released when dropped, so
/// the underlying connection is returned on every exit path, early `?`
/// returns included.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open a session against the shared database.
    pub async fn open(db: &Database) -> crate::Result<Self> {
        let conn = db.connect()?;
        // PRAGMAs are per connection
        pragma(&conn, "PRAGMA foreign_keys = ON").await?;
        pragma(&conn, "PRAGMA busy_timeout = 5000").await?;
        Ok(Self { conn })
    }
}

/// Run a PRAGMA, stepping it once whether or not it reports a value.
async fn pragma(conn: &Connection, sql: &str) -> crate::Result<()> {
    let mut rows = conn.query(sql, ()).await?;
    rows.next().await?;
    Ok(())
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

// Re-export commonly used libsql types for convenience
pub use libsql::{Connection as DbConnection, Row, params};
