use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::{header, Request, Response, StatusCode};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::handlers::http::utils::{deliver_envelope, http_only_cookie, ApiBody};
use crate::security::CSRF_COOKIE;
use crate::AppState;

/// GET /api/csrf-token — hand the client its double-submit token.
///
/// The token goes out twice: in the response body for the client to
/// echo back in `x-csrf-token`, and as an HttpOnly cookie the browser
/// sends on its own. The cookie lives as long as a refresh token, so a
/// client session never outlasts its CSRF pair.
pub async fn handle_csrf_token(
    _req: Request<Bytes>,
    state: AppState,
) -> Result<Response<ApiBody>> {
    let max_age = state.config.read().await.auth.refresh_expiry_secs;
    let token = Uuid::new_v4().to_string();

    debug!("Issued CSRF token");

    let mut response = deliver_envelope(
        "CSRF token issued",
        json!({ "csrfToken": token }),
        StatusCode::OK,
    )?;

    let cookie = http_only_cookie(CSRF_COOKIE, &token, max_age)
        .context("Failed to build CSRF cookie")?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}
