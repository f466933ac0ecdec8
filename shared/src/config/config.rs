use std::fs;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_connections must be greater than 0".into(),
        ));
    }

    if config.database.url.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "database.url cannot be empty".into(),
        ));
    }

    // An empty allow-list would make CORS and the CSRF guard reject every
    // browser request, which is never what a deployment wants.  Fail loudly
    // at startup instead.
    if config.security.allowed_origins.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "security.allowed_origins cannot be empty".into(),
        ));
    }

    if config.security.rate_limit.window_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "rate_limit.window_ms must be greater than 0".into(),
        ));
    }

    if config.security.rate_limit.max == 0 {
        return Err(ConfigError::InvalidConfig(
            "rate_limit.max must be greater than 0".into(),
        ));
    }

    // Both token secrets must be resolvable (env var or config field) and
    // long enough.  Validated here so a bad config is rejected at startup
    // rather than failing at the first login.
    let access = match config.auth.resolved_access_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "access secret must be set via the JWT_SECRET env var or auth.access_secret"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "access secret must be at least 32 characters long".into(),
            ));
        }
        Some(secret) => secret,
    };

    match config.auth.resolved_refresh_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "refresh secret must be set via the JWT_SECRET_REFRESH env var or auth.refresh_secret"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "refresh secret must be at least 32 characters long".into(),
            ));
        }
        Some(secret) if secret == access => {
            return Err(ConfigError::InvalidConfig(
                "access and refresh secrets must differ".into(),
            ));
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::server_config::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                bind: "127.0.0.1".into(),
                port: 1337,
                max_connections: 100,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".into(),
            },
            security: SecurityConfig {
                allowed_origins: vec!["http://localhost:3000".into()],
                api_prefix: "/api".into(),
                rate_limit: RateLimitSettings {
                    window_ms: 60_000,
                    max: 100,
                    message: None,
                },
            },
            auth: AuthConfig {
                access_expiry_secs: 900,
                refresh_expiry_secs: 86_400,
                access_secret: Some("a".repeat(32)),
                refresh_secret: Some("b".repeat(32)),
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_origin_list() {
        let mut cfg = valid_config();
        cfg.security.allowed_origins.clear();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_rate_limit_window() {
        let mut cfg = valid_config();
        cfg.security.rate_limit.window_ms = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_short_secret() {
        let mut cfg = valid_config();
        cfg.auth.access_secret = Some("short".into());
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_identical_secrets() {
        let mut cfg = valid_config();
        cfg.auth.refresh_secret = cfg.auth.access_secret.clone();
        assert!(validate_config(&cfg).is_err());
    }
}
