//! Request admission pipeline.
//!
//! Every request flows through CORS, then the CSRF guard, then the rate
//! limiter, and only then reaches the router. The innermost service
//! collects the body into memory so handlers parse plain bytes, and it
//! is the single place handler errors become a generic 500.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Request, Response, StatusCode};
use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;
use tracing::error;

use crate::handlers::http::auth::{
    handle_csrf_token, handle_login, handle_refresh_token, handle_register,
};
use crate::handlers::http::users::{
    handle_delete_user, handle_get_user, handle_list_users, handle_update_user,
};
use crate::handlers::http::utils::{deliver_message_json, deliver_text, ApiBody};
use crate::handlers::http::Router;
use crate::security::{OriginValidator, RateLimitConfig};
use crate::tower_middle::{cors_layer, CsrfLayer, RateLimiterLayer};
use crate::AppState;

use shared::types::AppConfig;

/// All routes, rooted at the configured API prefix.
pub fn build_router(prefix: &str) -> Router {
    Router::new()
        .post(&format!("{}/users", prefix), handle_register)
        .post(&format!("{}/login", prefix), handle_login)
        .get(&format!("{}/refresh-token", prefix), handle_refresh_token)
        .get(&format!("{}/csrf-token", prefix), handle_csrf_token)
        .get_auth(&format!("{}/users", prefix), handle_list_users)
        .get_auth(&format!("{}/users/:id", prefix), handle_get_user)
        .put_auth(&format!("{}/users/:id", prefix), handle_update_user)
        .delete_auth(&format!("{}/users/:id", prefix), handle_delete_user)
}

/// The fully composed service: admission layers wrapped around dispatch.
///
/// Generic over the request body so the same composition serves real
/// connections (`hyper::body::Incoming`) and in-process test requests.
/// Boxed so the response future is `Send` by type, which the
/// per-connection `tokio::spawn` in `main` relies on.
pub fn api_service<B>(
    state: AppState,
    config: &AppConfig,
) -> BoxCloneSyncService<Request<B>, Response<ApiBody>, Infallible>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: std::fmt::Display + Send,
{
    let validator = OriginValidator::new(config.security.allowed_origins.clone());
    let prefix = config.security.api_prefix.clone();
    let rate_config = RateLimitConfig {
        window: config.security.rate_limit.window(),
        max: config.security.rate_limit.max,
        message: config.security.rate_limit.message.clone(),
    };

    let router = Arc::new(build_router(&prefix));
    let counters = state.counters.clone();

    let dispatch = tower::service_fn(move |req: Request<B>| {
        let router = router.clone();
        let state = state.clone();
        async move {
            let (parts, body) = req.into_parts();
            let bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    error!("Failed to read request body: {}", e);
                    return Ok::<_, Infallible>(bad_request());
                }
            };
            let req = Request::from_parts(parts, bytes);

            match router.route(req, state).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    error!("Handler error: {:#}", e);
                    Ok(internal_error())
                }
            }
        }
    });

    BoxCloneSyncService::new(
        ServiceBuilder::new()
            .layer(cors_layer(validator.clone()))
            .layer(CsrfLayer::new(validator, &prefix))
            .layer(RateLimiterLayer::new(counters, rate_config, &prefix))
            .service(dispatch),
    )
}

fn bad_request() -> Response<ApiBody> {
    deliver_message_json("Invalid request body", StatusCode::BAD_REQUEST)
        .unwrap_or_else(|_| deliver_text("Bad Request", StatusCode::BAD_REQUEST))
}

fn internal_error() -> Response<ApiBody> {
    deliver_message_json("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
        .unwrap_or_else(|_| {
            deliver_text("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
        })
}
