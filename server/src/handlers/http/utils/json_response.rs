use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::{header, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use tracing::debug;

use shared::types::ApiResponse;

/// Response body type used by every handler and middleware in the server.
pub type ApiBody = BoxBody<Bytes, Infallible>;

pub fn full<T: Into<Bytes>>(chunk: T) -> ApiBody {
    Full::new(chunk.into()).boxed()
}

/// Deliver a `{"message": ..., "data": ...}` envelope.
/// This is the primary helper all handlers should use instead of
/// writing their own one-off serialization + response-building blocks.
pub fn deliver_envelope<T: Serialize>(
    message: &str,
    data: T,
    status: StatusCode,
) -> Result<Response<ApiBody>> {
    let envelope = ApiResponse::with_data(message, data);
    let json = serde_json::to_string(&envelope).context("Failed to serialize response")?;

    debug!("Delivering envelope, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Deliver an envelope with `data: null` — the shape of handled errors
/// and of messages that carry no payload.
pub fn deliver_message_json(message: &str, status: StatusCode) -> Result<Response<ApiBody>> {
    let envelope = ApiResponse::message_only(message);
    let json = serde_json::to_string(&envelope).context("Failed to serialize response")?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Plain-text response — used by the CSRF guard's 403s, which predate the
/// JSON envelope and are kept byte-compatible.
pub fn deliver_text(body: &str, status: StatusCode) -> Response<ApiBody> {
    let mut response = Response::new(full(body.to_string()));
    *response.status_mut() = status;
    response
}
