//! Response mediation: the single place where transport responses become
//! decoded values or [`ApiError`]s.
//!
//! # Design
//! The body is read exactly once. A 2xx with a JSON content type is parsed
//! into a `serde_json::Value` with no schema applied; any other 2xx comes back
//! as raw bytes. Everything else becomes an `ApiError`. Error bodies are tried
//! as JSON whatever their content type, and the recognised envelopes are
//! `{"error": {"code", "message"}}`, `{"error": "message"}` and a top-level
//! `{"code", "message"}`. Bodies that do not parse fall back to the status
//! text.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, Error, Result};
use crate::http::HttpResponse;

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Raw(Bytes),
}

impl Decoded {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(v) => Some(v),
            Decoded::Raw(_) => None,
        }
    }

    /// The JSON value, treating an empty raw body (e.g. a 204) as `null`.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Decoded::Json(v) => Ok(v),
            Decoded::Raw(b) if b.is_empty() => Ok(Value::Null),
            Decoded::Raw(b) => Err(Error::Deserialization(format!(
                "expected a JSON response, got {} bytes of another content type",
                b.len()
            ))),
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Decoded::Json(v) => Bytes::from(v.to_string()),
            Decoded::Raw(b) => b,
        }
    }
}

/// Decode `response`, or map a non-2xx status into [`Error::Api`].
pub fn decode(response: HttpResponse) -> Result<Decoded> {
    let status = response.status;
    let json = is_json(&response.headers);
    let body = response.into_bytes()?;

    if !status.is_success() {
        let err = api_error(status, body);
        warn!(status = err.status, code = ?err.code, message = %err.message, "api request failed");
        return Err(err.into());
    }

    if !json {
        return Ok(Decoded::Raw(body));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Decoded::Json(Value::Null));
    }
    serde_json::from_slice(&body)
        .map(Decoded::Json)
        .map_err(|e| Error::Deserialization(e.to_string()))
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

fn api_error(status: StatusCode, body: Bytes) -> ApiError {
    let (code, message) = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => extract(&payload),
        Err(_) => (None, None),
    };
    ApiError {
        status: status.as_u16(),
        code,
        message: message.unwrap_or_else(|| status_text(status)),
        body,
    }
}

fn extract(payload: &Value) -> (Option<String>, Option<String>) {
    let text = |v: &Value, key: &str| v.get(key).and_then(Value::as_str).map(str::to_string);
    match payload.get("error") {
        Some(inner) if inner.is_object() => (text(inner, "code"), text(inner, "message")),
        Some(Value::String(message)) => (text(payload, "code"), Some(message.clone())),
        _ => (text(payload, "code"), text(payload, "message")),
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP error {}", status.as_u16()),
    }
}
