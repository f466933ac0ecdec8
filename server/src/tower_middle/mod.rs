pub mod cors;
pub mod tower_csrf;
pub mod tower_rate_limiter;

pub use cors::cors_layer;
pub use tower_csrf::CsrfLayer;
pub use tower_rate_limiter::RateLimiterLayer;
