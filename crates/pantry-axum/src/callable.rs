//! Callable-protocol plumbing: request envelope, response envelope and
//! caller identity.
//!
//! Requests look like `{"data": {...}}`. Both the body and `data` may be
//! omitted, in which case the operation sees its default (all-absent) input.
//! Successful responses are wrapped as `{"result": ...}`.

use std::convert::Infallible;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HttpError;
use crate::state::AppState;

/// Message returned for bodies that are not a valid callable envelope.
const BAD_REQUEST: &str = "Bad Request";

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
}

/// Extracts the `data` payload of a callable request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Callable<T>(pub T);

impl<T, S> FromRequest<S> for Callable<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read callable body");
            HttpError::InvalidArgument(BAD_REQUEST.to_string())
        })?;

        parse_envelope(&body).map(Callable)
    }
}

fn parse_envelope<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Malformed callable body");
        HttpError::InvalidArgument(BAD_REQUEST.to_string())
    })?;

    // Anything but an object carries no fields; let the operation's own
    // checks reject it.
    match envelope.data {
        Some(data @ Value::Object(_)) => serde_json::from_value(data).map_err(|e| {
            tracing::debug!(error = %e, "Callable data does not match the operation input");
            HttpError::InvalidArgument(BAD_REQUEST.to_string())
        }),
        Some(Value::Null) | None => Ok(T::default()),
        Some(other) => {
            tracing::debug!(kind = json_kind(&other), "Ignoring non-object callable data");
            Ok(T::default())
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Successful callable response: `{"result": T}`.
#[derive(Debug, Serialize)]
pub struct CallableResult<T> {
    result: T,
}

impl<T> CallableResult<T> {
    pub const fn new(result: T) -> Self {
        Self { result }
    }
}

impl<T: Serialize> IntoResponse for CallableResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// ID of the signed-in caller, if any.
///
/// Read from the configured trusted header; a missing, empty or non-UTF-8
/// value means "not signed in".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Option<String>);

impl Caller {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(&state.caller_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self(caller))
    }
}
