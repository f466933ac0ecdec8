/// Request-admission primitives.
///
/// Pure logic lives here (origin validation, the CSRF state machine, the
/// fixed-window counter math); the tower wrappers that apply it per
/// request live in `crate::tower_middle`.
pub mod csrf;
pub mod origin;
pub mod rate_limit;
pub mod store;

pub use csrf::{check_csrf, CsrfDecision, CSRF_COOKIE, CSRF_HEADER};
pub use origin::OriginValidator;
pub use rate_limit::{check_and_increment, client_identity, rate_limit_key, Decision, RateLimitConfig};
pub use store::{CounterStore, MemoryStore, StoreError};
