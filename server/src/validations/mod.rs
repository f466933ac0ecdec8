pub mod user;

pub use user::{validate_create, validate_login, validate_update, ValidationError};
