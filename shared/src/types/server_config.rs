use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `"sqlite://invitations.db?mode=rwc"`.
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Origins trusted by both CORS and the CSRF guard.
    ///
    /// Matching is case-sensitive and byte-exact: `"http://localhost:3000"`
    /// and `"http://localhost:3000/"` are two different origins.  Entries
    /// must be written exactly as browsers send the `Origin` header.
    pub allowed_origins: Vec<String>,

    /// Path prefix the CSRF guard and rate limiter act on.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    /// Fixed window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Requests allowed per window per (path, client) pair.
    #[serde(default = "default_max_requests")]
    pub max: u64,

    /// Body text of the 429 response.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Access-token lifetime. Default 15 minutes.
    #[serde(default = "default_access_expiry")]
    pub access_expiry_secs: u64,

    /// Refresh-token lifetime. Default 24 hours.
    #[serde(default = "default_refresh_expiry")]
    pub refresh_expiry_secs: u64,

    /// HMAC key for access tokens.
    ///
    /// Prefer loading this via the `JWT_SECRET` environment variable.  This
    /// config field is the fallback for deployments that cannot inject env
    /// vars at runtime (e.g. certain container setups).
    ///
    /// **Minimum length:** 32 characters.
    pub access_secret: Option<String>,

    /// HMAC key for refresh tokens (`JWT_SECRET_REFRESH` env var takes
    /// priority).  Must differ from the access secret so an access token
    /// can never be replayed as a refresh token.
    pub refresh_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub auth: AuthConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"0.0.0.0:1337"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl RateLimitSettings {
    /// Window length as a `Duration` — convenience for store TTLs.
    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.window_ms)
    }
}

impl AuthConfig {
    /// Resolve the access-token secret with the `JWT_SECRET` env var taking
    /// priority over the config file field.
    ///
    /// Returns `None` when neither source is set (the server startup code
    /// treats this as a hard error).
    pub fn resolved_access_secret(&self) -> Option<String> {
        std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.access_secret.clone())
            .filter(|s| !s.is_empty())
    }

    /// Resolve the refresh-token secret (`JWT_SECRET_REFRESH` env var first).
    pub fn resolved_refresh_secret(&self) -> Option<String> {
        std::env::var("JWT_SECRET_REFRESH")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.refresh_secret.clone())
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_port() -> u16 {
    1337
}

pub fn default_max_connections() -> usize {
    1000
}

pub fn default_api_prefix() -> String {
    "/api".to_string()
}

pub fn default_window_ms() -> u64 {
    60_000
}

pub fn default_max_requests() -> u64 {
    100
}

pub fn default_access_expiry() -> u64 {
    60 * 15
}

pub fn default_refresh_expiry() -> u64 {
    60 * 60 * 24
}
