use std::sync::Arc;
use std::time::Duration;

use hyper::HeaderMap;
use tracing::{error, warn};

use crate::security::store::CounterStore;

/// Fixed-window limiter settings, shared by every `/api` route.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Window length; the counter resets at fixed boundaries of this size.
    pub window: Duration,
    /// Requests allowed per window per (path, client) pair.
    pub max: u64,
    /// Body text of the 429 response.
    pub message: Option<String>,
}

pub const DEFAULT_LIMIT_MESSAGE: &str = "Too Many Requests";

impl RateLimitConfig {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_LIMIT_MESSAGE)
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited,
}

/// Derive the client identity used in the limiting key.
///
/// Priority order is a deliberate policy: the device/local-network IP
/// (`x-real-ip`) is trusted over the generic forwarded chain, which is
/// trusted over the proxy-supplied public IP (`cf-connecting-ip`).
/// Requests carrying none of the three share the `"unknown"` bucket.
pub fn client_identity(headers: &HeaderMap) -> String {
    for name in ["x-real-ip", "x-forwarded-for", "cf-connecting-ip"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            return value.to_string();
        }
    }
    "unknown".to_string()
}

/// Limiting key: one counter per (path, client) pair.
pub fn rate_limit_key(path: &str, identity: &str) -> String {
    format!("rate_limit:{}:{}", path, identity)
}

/// Read-check-increment for one request.
///
/// Store failures fail open on both the read and the write side: a request
/// is never blocked because the counter store is unreachable, and a dropped
/// increment merely under-counts.  The read-then-write pair is not atomic;
/// two concurrent requests at the window boundary can both pass.
pub async fn check_and_increment(
    store: &Arc<dyn CounterStore>,
    key: &str,
    config: &RateLimitConfig,
) -> Decision {
    let current = match store.get(key).await {
        Ok(count) => count.unwrap_or(0),
        Err(e) => {
            // Fail open: availability over strict enforcement.  Do not
            // increment — the window state is unknowable anyway.
            error!("Error reading from counter store: {}", e);
            return Decision::Allowed;
        }
    };

    if current >= config.max {
        warn!(key = %key, count = current, "Rate limit exceeded");
        return Decision::Limited;
    }

    if let Err(e) = store.put(key, current + 1, config.window).await {
        error!("Error writing to counter store: {}", e);
        // Fail open here too; the request already passed the check.
    }

    Decision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::store::MemoryStore;
    use hyper::header::HeaderValue;

    fn config(max: u64, window_ms: u64) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_millis(window_ms),
            max,
            message: None,
        }
    }

    fn store() -> Arc<dyn CounterStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn identity_prefers_real_ip_over_proxy_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.100"));
        assert_eq!(client_identity(&headers), "192.168.1.100");
    }

    #[test]
    fn identity_falls_back_through_the_priority_chain() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.1"));
        assert_eq!(client_identity(&headers), "203.0.113.1");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.7"),
        );
        assert_eq!(client_identity(&headers), "198.51.100.7");

        assert_eq!(client_identity(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn key_combines_path_and_identity() {
        assert_eq!(
            rate_limit_key("/api/users", "192.168.1.100"),
            "rate_limit:/api/users:192.168.1.100"
        );
    }

    #[tokio::test]
    async fn allows_up_to_max_then_limits() {
        let store = store();
        let cfg = config(3, 60_000);
        let key = rate_limit_key("/api/users", "10.0.0.1");

        for _ in 0..3 {
            assert_eq!(check_and_increment(&store, &key, &cfg).await, Decision::Allowed);
        }
        assert_eq!(check_and_increment(&store, &key, &cfg).await, Decision::Limited);
        // Rejected requests do not increment further.
        assert_eq!(store.get(&key).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn counter_resets_after_window() {
        let store = store();
        let cfg = config(1, 30);
        let key = rate_limit_key("/api/users", "10.0.0.2");

        assert_eq!(check_and_increment(&store, &key, &cfg).await, Decision::Allowed);
        assert_eq!(check_and_increment(&store, &key, &cfg).await, Decision::Limited);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(check_and_increment(&store, &key, &cfg).await, Decision::Allowed);
    }

    #[tokio::test]
    async fn separate_identities_do_not_share_a_window() {
        let store = store();
        let cfg = config(1, 60_000);
        let a = rate_limit_key("/api/users", "10.0.0.3");
        let b = rate_limit_key("/api/users", "10.0.0.4");

        assert_eq!(check_and_increment(&store, &a, &cfg).await, Decision::Allowed);
        assert_eq!(check_and_increment(&store, &b, &cfg).await, Decision::Allowed);
        assert_eq!(check_and_increment(&store, &a, &cfg).await, Decision::Limited);
    }

    #[tokio::test]
    async fn store_errors_fail_open() {
        struct BrokenStore;

        impl CounterStore for BrokenStore {
            fn get(
                &self,
                _key: &str,
            ) -> futures_util::future::BoxFuture<'_, Result<Option<u64>, crate::security::store::StoreError>>
            {
                Box::pin(async {
                    Err(crate::security::store::StoreError::Unavailable(
                        "connection refused".into(),
                    ))
                })
            }

            fn put(
                &self,
                _key: &str,
                _count: u64,
                _ttl: Duration,
            ) -> futures_util::future::BoxFuture<'_, Result<(), crate::security::store::StoreError>>
            {
                Box::pin(async {
                    Err(crate::security::store::StoreError::Unavailable(
                        "connection refused".into(),
                    ))
                })
            }
        }

        let store: Arc<dyn CounterStore> = Arc::new(BrokenStore);
        let cfg = config(1, 60_000);
        // Every request passes when the store is unreachable.
        for _ in 0..5 {
            assert_eq!(
                check_and_increment(&store, "k", &cfg).await,
                Decision::Allowed
            );
        }
    }
}
