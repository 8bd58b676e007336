//! Shared helpers for the router integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pantry_axum::{AxumContext, DEFAULT_CALLER_HEADER, ServerConfig, create_router};
use pantry_core::{FunctionsConfig, PantryFunctions, Providers};
use serde_json::Value;
use tower::ServiceExt;

/// Router over the given providers with default tunables.
pub fn app(providers: Providers, server: &ServerConfig) -> Router {
    let functions = Arc::new(PantryFunctions::new(providers, FunctionsConfig::default()));
    create_router(AxumContext::new(functions), server)
}

/// Build a callable POST request.
pub fn callable_request(path: &str, caller: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(caller) = caller {
        builder = builder.header(DEFAULT_CALLER_HEADER, caller);
    }
    let body = body.map_or_else(Body::empty, |json| Body::from(json.to_string()));
    builder.body(body).unwrap()
}

/// Send one request and decode the JSON response body (`Null` when empty).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// POST a callable request and decode the response.
pub async fn call(
    app: Router,
    path: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(app, callable_request(path, caller, body)).await
}
