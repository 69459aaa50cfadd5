//! HTTP response builders.
//!
//! Provides convenient functions for building JSON responses.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Response body type used throughout taskboard.
pub type Body = Full<Bytes>;

/// Full response type used throughout taskboard.
pub type HttpResponse = Response<Body>;

/// Build a JSON response with the given status code and body.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> crate::Result<HttpResponse> {
    let json = serde_json::to_string(body)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap())
}

/// Build a 200 OK JSON response.
pub fn ok<T: Serialize>(body: &T) -> crate::Result<HttpResponse> {
    json(StatusCode::OK, body)
}

/// Build a 201 Created JSON response pointing at the new resource.
pub fn created<T: Serialize>(location: &str, body: &T) -> crate::Result<HttpResponse> {
    let location = HeaderValue::from_str(location)
        .map_err(|_| crate::Error::Internal(format!("Invalid location: {location}")))?;
    let mut response = json(StatusCode::CREATED, body)?;
    response.headers_mut().insert("Location", location);
    Ok(response)
}

/// Build a 204 No Content response.
pub fn no_content() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap()
}
