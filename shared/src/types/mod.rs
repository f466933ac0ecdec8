pub mod api;
pub mod jwt;
pub mod server_config;
pub mod user;

pub use self::api::ApiResponse;
pub use self::jwt::TokenClaims;
pub use self::server_config::{AppConfig, ConfigError};
pub use self::user::{
    AuthData, CreateUserData, LoginData, UpdateUserData, User, PASSWORD_REDACTED,
};
