use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use tower::{Layer, Service};

use crate::handlers::http::utils::{deliver_text, get_cookie, get_header_value, get_origin};
use crate::security::{check_csrf, CsrfDecision, OriginValidator, CSRF_COOKIE, CSRF_HEADER};

/// Tower layer applying the CSRF guard to every request under the API
/// prefix.
///
/// One guard, applied uniformly: safe methods pass untouched; unsafe
/// methods need a trusted `Origin` plus a double-submit token match.
/// The check is pure — rejected requests never reach the inner service.
#[derive(Clone)]
pub struct CsrfLayer {
    validator: OriginValidator,
    prefix: String,
}

impl CsrfLayer {
    pub fn new(validator: OriginValidator, prefix: &str) -> Self {
        Self {
            validator,
            prefix: prefix.to_string(),
        }
    }
}

impl<S> Layer<S> for CsrfLayer {
    type Service = CsrfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfService {
            inner,
            validator: self.validator.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CsrfService<S> {
    inner: S,
    validator: OriginValidator,
    prefix: String,
}

impl<S, ReqBody> Service<Request<ReqBody>> for CsrfService<S>
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

        let decision = if in_scope {
            let headers = req.headers();
            check_csrf(
                req.method(),
                get_origin(headers).as_deref(),
                get_header_value(headers, CSRF_HEADER).as_deref(),
                get_cookie(headers, CSRF_COOKIE).as_deref(),
                &self.validator,
            )
        } else {
            CsrfDecision::Allowed
        };

        let mut inner = self.inner.clone();

        Box::pin(async move {
            match decision {
                CsrfDecision::Allowed => inner.call(req).await,
                rejected => {
                    tracing::warn!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        "CSRF guard rejected request: {}",
                        rejected.reason()
                    );
                    Ok(deliver_text(rejected.reason(), StatusCode::FORBIDDEN))
                }
            }
        })
    }
}
