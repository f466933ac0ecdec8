use hyper::Method;

use crate::security::origin::OriginValidator;

/// Name of the HTTP-only cookie holding the server-issued token.
pub const CSRF_COOKIE: &str = "csrf-token";

/// Name of the header the client must echo the token back in.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Outcome of the per-request CSRF state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfDecision {
    Allowed,
    /// Origin header missing or not trusted.
    InvalidOrigin,
    /// Header token missing, cookie missing, or the two differ.
    InvalidToken,
}

impl CsrfDecision {
    /// Human-readable rejection text for the 403 body.
    pub fn reason(&self) -> &'static str {
        match self {
            CsrfDecision::Allowed => "",
            CsrfDecision::InvalidOrigin => "Forbidden: Invalid origin",
            CsrfDecision::InvalidToken => "Forbidden: CSRF token invalid",
        }
    }
}

/// Per-request CSRF check: origin validation plus double-submit comparison.
///
/// Safe methods (GET/HEAD/OPTIONS) skip every check.  Unsafe methods must
/// present a trusted `Origin`, then a header token equal by value to the
/// cookie token.  The check is synchronous and side-effect-free — it never
/// mutates state, so it is idempotent and safe to test in isolation.
pub fn check_csrf(
    method: &Method,
    origin: Option<&str>,
    header_token: Option<&str>,
    cookie_token: Option<&str>,
    validator: &OriginValidator,
) -> CsrfDecision {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return CsrfDecision::Allowed;
    }

    if !validator.is_allowed(origin) {
        return CsrfDecision::InvalidOrigin;
    }

    match (header_token, cookie_token) {
        (Some(header), Some(cookie)) if header == cookie => CsrfDecision::Allowed,
        _ => CsrfDecision::InvalidToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> OriginValidator {
        OriginValidator::new(vec!["http://localhost:3000".to_string()])
    }

    #[test]
    fn safe_methods_skip_all_checks() {
        let v = validator();
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            // No origin, no tokens — still allowed.
            assert_eq!(
                check_csrf(&method, None, None, None, &v),
                CsrfDecision::Allowed
            );
        }
    }

    #[test]
    fn unsafe_method_without_origin_is_rejected() {
        assert_eq!(
            check_csrf(&Method::POST, None, Some("t"), Some("t"), &validator()),
            CsrfDecision::InvalidOrigin
        );
    }

    #[test]
    fn unsafe_method_with_untrusted_origin_is_rejected() {
        assert_eq!(
            check_csrf(
                &Method::DELETE,
                Some("https://malicious-site.com"),
                Some("t"),
                Some("t"),
                &validator()
            ),
            CsrfDecision::InvalidOrigin
        );
    }

    #[test]
    fn matching_tokens_pass() {
        assert_eq!(
            check_csrf(
                &Method::POST,
                Some("http://localhost:3000"),
                Some("abc123"),
                Some("abc123"),
                &validator()
            ),
            CsrfDecision::Allowed
        );
    }

    #[test]
    fn missing_or_mismatched_tokens_are_rejected() {
        let v = validator();
        let origin = Some("http://localhost:3000");
        assert_eq!(
            check_csrf(&Method::POST, origin, None, Some("abc"), &v),
            CsrfDecision::InvalidToken
        );
        assert_eq!(
            check_csrf(&Method::PUT, origin, Some("abc"), None, &v),
            CsrfDecision::InvalidToken
        );
        assert_eq!(
            check_csrf(&Method::POST, origin, Some("abc"), Some("xyz"), &v),
            CsrfDecision::InvalidToken
        );
    }

    #[test]
    fn rejection_reasons_are_human_readable() {
        assert_eq!(
            CsrfDecision::InvalidOrigin.reason(),
            "Forbidden: Invalid origin"
        );
        assert_eq!(
            CsrfDecision::InvalidToken.reason(),
            "Forbidden: CSRF token invalid"
        );
    }
}
