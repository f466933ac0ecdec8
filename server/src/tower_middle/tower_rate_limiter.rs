use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use tower::{Layer, Service};

use crate::handlers::http::utils::full;
use crate::security::{
    check_and_increment, client_identity, rate_limit_key, CounterStore, Decision, RateLimitConfig,
};

/// Fixed-window rate limiting as a tower layer.
///
/// Each (path, caller identity) pair gets its own counter in the shared
/// [`CounterStore`]. Store failures let traffic through; availability
/// wins over strict enforcement when the backend misbehaves.
#[derive(Clone)]
pub struct RateLimiterLayer {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
    prefix: String,
}

impl RateLimiterLayer {
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig, prefix: &str) -> Self {
        Self {
            store,
            config,
            prefix: prefix.to_string(),
        }
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiterService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiterService {
            inner,
            store: self.store.clone(),
            config: self.config.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimiterService<S> {
    inner: S,
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
    prefix: String,
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimiterService<S>
where
    S: Service<Request<ReqBody>, Response = Response<BoxBody<Bytes, Infallible>>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let in_scope = req.uri().path().starts_with(&self.prefix);
        let key = if in_scope {
            Some(rate_limit_key(
                req.uri().path(),
                &client_identity(req.headers()),
            ))
        } else {
            None
        };

        let store = self.store.clone();
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Some(key) = key {
                match check_and_increment(&store, &key, &config).await {
                    Decision::Allowed => {}
                    Decision::Limited => {
                        tracing::warn!(%key, "rate limit exceeded");
                        let body = json!({ "error": config.message() }).to_string();
                        let response = Response::builder()
                            .status(StatusCode::TOO_MANY_REQUESTS)
                            .header("Content-Type", "application/json")
                            .body(full(body))
                            .unwrap_or_else(|_| Response::new(full("")));
                        return Ok(response);
                    }
                }
            }
            inner.call(req).await
        })
    }
}
