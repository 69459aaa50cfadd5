//! Taskboard - todo and category tracking HTTP backend.
//!
//! Todos are grouped into categories and managed over a JSON API:
//!
//! - **Config**: Layered configuration (file → env → CLI)
//! - **Database**: libsql/Turso storage with per-request sessions
//! - **Categories / Todos**: CRUD endpoints, todos are soft-deleted
//! - **OpenAPI**: generated document and interactive docs outside production
//! - **Server**: Hyper-based HTTP server with permissive CORS
//!
//! # Example
//!
//! ```ignore
//! use taskboard::{ConfigLoader, config::Overrides};
//!
//! #[tokio::main]
//! async fn main() -> taskboard::Result<()> {
//!     let config = ConfigLoader::default().load(None, Overrides::default())?;
//!
//!     let db = taskboard::db::connect(&config.database.url).await?;
//!     taskboard::db::migrate(&db).await?;
//!
//!     let router = taskboard::app(&config);
//!     let server = taskboard::server::start(config, Some(db.into()), router.into_handle()).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await
//! }
//! ```

pub mod categories;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod module;
pub mod openapi;
pub mod operation;
pub mod procedure;
pub mod response;
pub mod router;
pub mod server;
pub mod store;
pub mod todos;

// Re-export main types at crate root
pub use config::{Config, ConfigLoader, Environment};
pub use error::{Error, Result};
pub use module::Module;
pub use router::{Context, Router};

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

/// Path of the interactive documentation page.
pub const DOCS_PATH: &str = "/docs";

/// Build the service router: health probe, category and todo endpoints, and
/// the API documentation when the environment serves it.
pub fn app(config: &Config) -> Router {
    let mut router = Router::new();
    router.module(&module::Health);
    router.module(&categories::Categories);
    router.module(&todos::Todos);

    if config.environment.serves_docs() {
        router.openapi(
            OPENAPI_PATH,
            openapi::Info {
                title: "Taskboard",
                version: env!("CARGO_PKG_VERSION"),
            },
        );
        router.docs(DOCS_PATH, OPENAPI_PATH);
    }

    router
}
