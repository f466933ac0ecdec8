use hyper::header::{self, HeaderName, HeaderValue};
use hyper::Method;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::security::OriginValidator;

/// Build the CORS layer from the configured origin allow-list.
///
/// The predicate delegates to [`OriginValidator`] so CORS and the CSRF
/// guard agree on what counts as a trusted origin. Credentials are
/// allowed, which rules out a wildcard origin.
pub fn cors_layer(validator: OriginValidator) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts| {
                validator.is_allowed(origin.to_str().ok())
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-csrf-token"),
        ])
}
