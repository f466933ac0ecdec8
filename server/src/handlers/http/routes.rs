use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Method, Request, Response, StatusCode};
use tracing::warn;

use crate::handlers::http::utils::{deliver_message_json, get_bearer_token};
use crate::AppState;

use shared::types::TokenClaims;

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
// Two security tiers:
//
//   RouteHandler — no auth.  Receives (req, state).
//                  Use for: /register, /login, /refresh-token, /csrf-token.
//
//   AuthHandler  — access-token signature + expiry verified by the router.
//                  Receives (req, state, claims).
//                  Use for: everything under /users.
//
// The request body is already collected into `Bytes` by the time the
// router runs, so handlers parse without touching the connection.

type RouteHandler = Box<
    dyn Fn(
            Request<Bytes>,
            AppState,
        )
            -> Pin<Box<dyn Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send>>
        + Send
        + Sync,
>;

type AuthHandler = Box<
    dyn Fn(
            Request<Bytes>,
            AppState,
            TokenClaims,
        )
            -> Pin<Box<dyn Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send>>
        + Send
        + Sync,
>;

enum RouteKind {
    /// No authentication check.
    Open(RouteHandler),

    /// Access-token auth. Handler receives the decoded [`TokenClaims`].
    Auth(AuthHandler),
}

struct Route {
    method: Method,
    path: String,
    kind: RouteKind,
}

/// The route pattern dispatch matched, e.g. `/api/users/:id`, stored in
/// request extensions so handlers resolve `:param` values against the
/// pattern actually registered (the prefix is configuration, not a
/// constant).
#[derive(Clone, Debug)]
pub struct MatchedPath(pub String);

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    // ── Open (no auth) ────────────────────────────────────────────────────────

    /// GET with no authentication.
    pub fn get<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::GET,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    /// POST with no authentication — use only for register / login /
    /// token endpoints.
    pub fn post<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::POST,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    // ── Access-token auth ─────────────────────────────────────────────────────
    //
    // The router verifies the bearer token before the handler is called.
    // Handlers receive `TokenClaims` and must NOT re-verify the token
    // themselves — the work is already done.

    /// GET guarded by access-token auth.
    pub fn get_auth<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, TokenClaims) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::GET,
            path: path.to_string(),
            kind: RouteKind::Auth(Box::new(move |req, state, claims| {
                Box::pin(handler(req, state, claims))
            })),
        });
        self
    }

    /// PUT guarded by access-token auth.
    pub fn put_auth<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, TokenClaims) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::PUT,
            path: path.to_string(),
            kind: RouteKind::Auth(Box::new(move |req, state, claims| {
                Box::pin(handler(req, state, claims))
            })),
        });
        self
    }

    /// DELETE guarded by access-token auth.
    pub fn delete_auth<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, TokenClaims) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::DELETE,
            path: path.to_string(),
            kind: RouteKind::Auth(Box::new(move |req, state, claims| {
                Box::pin(handler(req, state, claims))
            })),
        });
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(
        &self,
        mut req: Request<Bytes>,
        state: AppState,
    ) -> Result<Response<BoxBody<Bytes, Infallible>>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !Self::path_matches(&route.path, &path) {
                continue;
            }

            req.extensions_mut()
                .insert(MatchedPath(route.path.clone()));

            return match &route.kind {
                RouteKind::Open(h) => h(req, state).await,

                RouteKind::Auth(h) => {
                    let token = get_bearer_token(req.headers());
                    let verified = token
                        .as_deref()
                        .ok_or_else(|| "missing bearer token".to_string())
                        .and_then(|t| {
                            state
                                .keys
                                .verify_access(t)
                                .map_err(|e| e.to_string())
                        });

                    match verified {
                        Ok(claims) => h(req, state, claims).await,
                        Err(reason) => {
                            warn!("Auth rejected {} {}: {}", method, path, reason);
                            unauthorized()
                        }
                    }
                }
            };
        }

        deliver_message_json("Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);

        if route_path == clean {
            return true;
        }

        // Segment-by-segment matching for `:param` wildcards.
        // e.g.  "/api/users/:id"  matches  "/api/users/42"
        let route_segs: Vec<&str> = route_path.split('/').collect();
        let path_segs: Vec<&str> = clean.split('/').collect();

        if route_segs.len() != path_segs.len() {
            return false;
        }

        route_segs
            .iter()
            .zip(path_segs.iter())
            .all(|(r, p)| r.starts_with(':') || r == p)
    }

    /// Value of the `:param` segment of `route_path` in `request_path`.
    pub fn path_param(route_path: &str, request_path: &str) -> Option<String> {
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path
            .split('/')
            .zip(clean.split('/'))
            .find(|(r, _)| r.starts_with(':'))
            .map(|(_, p)| p.to_string())
    }

    /// `:param` value for the route this request was dispatched on.
    pub fn matched_param(req: &Request<Bytes>) -> Option<String> {
        req.extensions()
            .get::<MatchedPath>()
            .and_then(|matched| Self::path_param(&matched.0, req.uri().path()))
    }
}

fn unauthorized() -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_message_json("Unauthorized", StatusCode::UNAUTHORIZED)
        .context("Failed to deliver 401 response")
}
