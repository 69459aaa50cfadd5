//! Endpoint definitions.
//!
//! Each category and todo endpoint is one `Procedure` type: its route, its
//! request and response shapes, and its handler. `Router::procedure` turns
//! that into a live route plus an entry in the OpenAPI document.

use std::future::Future;

use hyper::Method;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::router::Context;

/// Route, summary, tag and success status of an endpoint.
pub struct Meta {
    pub path: &'static str,
    pub method: Method,
    pub summary: &'static str,
    pub tag: &'static str,
    pub status: u16,
}

impl Meta {
    fn new(method: Method, path: &'static str) -> Self {
        Self {
            path,
            method,
            summary: "",
            tag: "",
            status: 200,
        }
    }

    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }
    pub fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }
    pub fn put(path: &'static str) -> Self {
        Self::new(Method::PUT, path)
    }
    pub fn delete(path: &'static str) -> Self {
        Self::new(Method::DELETE, path)
    }
    pub fn patch(path: &'static str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn summary(mut self, s: &'static str) -> Self {
        self.summary = s;
        self
    }
    pub fn tag(mut self, t: &'static str) -> Self {
        self.tag = t;
        self
    }
    pub fn status(mut self, s: u16) -> Self {
        self.status = s;
        self
    }
}

/// Request body of endpoints that read nothing from it (GET, DELETE).
///
/// Any body is accepted and ignored. No `requestBody` is documented.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<'de> serde::Deserialize<'de> for Empty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let _ = serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Empty)
    }
}

impl JsonSchema for Empty {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "Empty".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::Schema::default()
    }
}

/// One endpoint.
///
/// A `204` status sends no body; a `201` status sends the output together
/// with the `Location` returned by [`Procedure::location`].
pub trait Procedure: Send + Sync + 'static {
    /// Route metadata (path, method, summary, tag, status code).
    fn meta() -> Meta;

    /// Request body type. Use `Empty` for procedures with no request body.
    type Input: DeserializeOwned + JsonSchema + Send;

    /// Response body type.
    type Output: Serialize + JsonSchema;

    /// The async handler.
    fn handle(
        ctx: Context,
        input: Self::Input,
    ) -> impl Future<Output = crate::Result<Self::Output>> + Send;

    /// Where the resource created by this procedure can be fetched.
    fn location(_output: &Self::Output) -> Option<String> {
        None
    }
}
