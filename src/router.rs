//! HTTP routing with matchit.
//!
//! Provides a simple router for registering and dispatching HTTP handlers.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::Result;
use crate::config::SharedConfig;
use crate::db;
use crate::response::{self, HttpResponse};

/// Boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handler context passed to route handlers.
pub struct Context {
    /// The HTTP method.
    pub method: Method,
    /// The request URI.
    pub uri: hyper::Uri,
    /// The request headers.
    pub headers: hyper::http::HeaderMap,
    /// Route parameters (e.g., {id} from path).
    pub params: HashMap<String, String>,
    /// The request body, pre-read as bytes.
    pub body: Bytes,
    /// Database handle. Optional for routes that don't need storage.
    pub db: Option<db::Handle>,
    /// Server configuration.
    pub config: SharedConfig,
}

impl Context {
    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| crate::Error::BadRequest(format!("Invalid request body: {e}")))
        } else {
            serde_json::from_slice(&self.body)
                .map_err(|e| crate::Error::BadRequest(format!("Invalid request body: {e}")))
        }
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a required route parameter, returning BadRequest if missing.
    pub fn require_param(&self, name: &str) -> Result<&str> {
        self.param(name)
            .ok_or_else(|| crate::Error::BadRequest(format!("Missing parameter: {name}")))
    }

    /// Get a required integer id parameter, returning BadRequest if malformed.
    pub fn id_param(&self, name: &str) -> Result<i64> {
        let raw = self.require_param(name)?;
        raw.parse()
            .map_err(|_| crate::Error::BadRequest(format!("Invalid {name}: {raw}")))
    }

    /// Require database, returning Internal error if not configured.
    pub fn require_db(&self) -> Result<&db::Handle> {
        self.db
            .as_ref()
            .ok_or_else(|| crate::Error::Internal("Database not configured".to_string()))
    }

    /// Open a storage session for this request.
    ///
    /// The session lives as long as the handler keeps it and is released when
    /// the handler returns.
    pub async fn session(&self) -> Result<db::Session> {
        db::Session::open(self.require_db()?).await
    }
}

/// Handler function type.
/// Takes a Context and returns a future resolving to a Response.
pub type Handler = Box<dyn Fn(Context) -> BoxFuture<'static, Result<HttpResponse>> + Send + Sync>;

/// A registered route with method-specific handlers.
struct RouteEntry {
    handlers: HashMap<Method, Handler>,
}

/// HTTP router for registering and dispatching requests.
pub struct Router {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
    pub(crate) operations: Vec<crate::operation::Meta>,
}

impl Router {
    /// Create a new router.
    pub fn new() -> Self {
        Self {
            routes: matchit::Router::new(),
            entries: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Register a handler for a method and path.
    pub fn route<F, Fut>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        // Find or create route entry for this path
        let entry_idx = match self.routes.at(path) {
            Ok(matched) => *matched.value,
            Err(_) => {
                let idx = self.entries.len();
                self.entries.push(RouteEntry {
                    handlers: HashMap::new(),
                });
                self.routes.insert(path, idx).ok();
                idx
            }
        };

        let boxed: Handler = Box::new(move |ctx| Box::pin(handler(ctx)));
        self.entries[entry_idx].handlers.insert(method, boxed);
    }

    /// Convenience method for GET requests.
    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    /// Register a [`Procedure`](crate::procedure::Procedure): wires up both
    /// the HTTP handler and OpenAPI metadata in one call.
    pub fn procedure<P: crate::procedure::Procedure>(&mut self) {
        let meta = P::meta();
        let method = meta.method.clone();
        let path = meta.path;
        let status = StatusCode::from_u16(meta.status).unwrap_or(StatusCode::OK);

        self.route(method, path, move |ctx| async move {
            let input: P::Input = ctx.json()?;
            let output = P::handle(ctx, input).await?;
            if status == StatusCode::NO_CONTENT {
                return Ok(response::no_content());
            }
            match P::location(&output) {
                Some(location) if status == StatusCode::CREATED => {
                    response::created(&location, &output)
                }
                _ => response::json(status, &output),
            }
        });

        // Collect OpenAPI metadata
        let input_schema = if std::any::TypeId::of::<P::Input>()
            == std::any::TypeId::of::<crate::procedure::Empty>()
        {
            None
        } else {
            Some(schemars::schema_for!(P::Input))
        };

        let output_schema = if status == StatusCode::NO_CONTENT {
            None
        } else {
            Some(schemars::schema_for!(P::Output))
        };

        self.operations.push(crate::operation::Meta {
            path: meta.path.to_string(),
            method: meta.method.to_string().to_lowercase(),
            summary: meta.summary.to_string(),
            tag: meta.tag.to_string(),
            status: meta.status,
            input_schema,
            output_schema,
        });
    }

    /// Register a GET route that serves the OpenAPI JSON document built from
    /// all previously registered procedures.
    pub fn openapi(&mut self, path: &str, info: crate::openapi::Info) {
        let json = Bytes::from(crate::openapi::generate(&info, &self.operations).to_string());
        self.get(path, move |_ctx| {
            let json = json.clone();
            async move {
                Ok(hyper::Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", "application/json")
                    .body(http_body_util::Full::new(json))
                    .unwrap())
            }
        });
    }

    /// Register a GET route serving an interactive documentation page for
    /// the OpenAPI document at `spec_path`.
    pub fn docs(&mut self, path: &str, spec_path: &str) {
        let page = crate::openapi::docs_page(spec_path);
        self.get(path, move |_ctx| {
            let page = page.clone();
            async move {
                Ok(hyper::Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .body(http_body_util::Full::new(page))
                    .unwrap())
            }
        });
    }

    /// Register every route of a module.
    pub fn module<M: crate::module::Module>(&mut self, module: &M) {
        tracing::debug!(module = module.name(), "registering routes");
        module.routes(self);
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe router handle for use in request handling.
pub struct RouterHandle {
    routes: matchit::Router<usize>,
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Convert to a thread-safe handle for use in request handling.
    pub fn into_handle(self) -> Arc<RouterHandle> {
        Arc::new(RouterHandle {
            routes: self.routes,
            entries: self.entries,
        })
    }
}

/// Result of matching a request to a route.
pub enum RouteMatch<'a> {
    /// Route matched with handler.
    Matched {
        handler: &'a Handler,
        params: HashMap<String, String>,
    },
    /// Path matched but method not allowed.
    MethodNotAllowed,
    /// Path not found.
    NotFound,
}

impl RouterHandle {
    /// Match a request to a route.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        match self.routes.at(path) {
            Ok(matched) => {
                let entry = &self.entries[*matched.value];

                let params: HashMap<String, String> = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();

                match entry.handlers.get(method) {
                    Some(handler) => RouteMatch::Matched { handler, params },
                    None => RouteMatch::MethodNotAllowed,
                }
            }
            Err(_) => RouteMatch::NotFound,
        }
    }
}
