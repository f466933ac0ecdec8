use anyhow::{anyhow, Result};
use hyper::header::{HeaderMap, HeaderValue};
use tracing::debug;

/// Extract a header value as a string
pub fn get_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// The client's declared `Origin`, exactly as sent — no normalization.
pub fn get_origin(headers: &HeaderMap) -> Option<String> {
    get_header_value(headers, "origin")
}

/// Extract cookie value by name
pub fn get_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                let name = parts.next()?.trim();
                let value = parts.next()?.trim();
                (name == cookie_name).then(|| value.to_string())
            })
        })
}

/// Build an HTTP-only `Set-Cookie` value scoped to the whole site.
///
/// `SameSite=Strict` alone already blocks most cross-site sends; the
/// double-submit check on top covers clients that ignore SameSite.
pub fn http_only_cookie(name: &str, value: &str, max_age_secs: u64) -> Result<HeaderValue> {
    let cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
        name, value, max_age_secs
    );

    debug!("Setting cookie: {}", name);

    HeaderValue::from_str(&cookie).map_err(|e| anyhow!("Invalid cookie value: {}", e))
}

/// Extract bearer token from Authorization header
/// Format: "Authorization: Bearer <token>"
pub fn get_bearer_token(headers: &HeaderMap) -> Option<String> {
    get_header_value(headers, "authorization").and_then(|auth| {
        auth.strip_prefix("Bearer ").map(|token| token.to_string())
    })
}
