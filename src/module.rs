//! Module trait for grouping related endpoints.
//!
//! Modules implement the `Module` trait to register their routes with the server.
//!
//! # Example
//!
//! ```ignore
//! use taskboard::{Module, Router};
//!
//! pub struct Health;
//!
//! impl Module for Health {
//!     fn name(&self) -> &'static str {
//!         "health"
//!     }
//!
//!     fn routes(&self, router: &mut Router) {
//!         router.get("/health", |_ctx| async move {
//!             taskboard::response::ok(&serde_json::json!({ "status": "ok" }))
//!         });
//!     }
//! }
//! ```

use crate::router::Router;

/// A group of endpoints registered together.
pub trait Module: Send + Sync {
    /// Module name for identification and logging.
    fn name(&self) -> &'static str;

    /// Register routes with the router.
    fn routes(&self, router: &mut Router);
}

/// Liveness probe at `GET /health`.
pub struct Health;

impl Module for Health {
    fn name(&self) -> &'static str {
        "health"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/health", |_ctx| async move {
            crate::response::ok(&serde_json::json!({ "status": "ok" }))
        });
    }
}
