pub mod tokens;

pub use tokens::{AuthError, TokenKeys};
