/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `user.rs` and `config.rs`).

// ---------------------------------------------------------------------------
// Token claims
// ---------------------------------------------------------------------------
mod claims_tests {
    use shared::types::*;

    fn sample_user() -> User {
        User {
            id: "ckx1y2z3".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: PASSWORD_REDACTED.to_string(),
        }
    }

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            id: "ckx1y2z3".to_string(),
            sub: sample_user(),
            exp: 9_999_999_999,
        }
    }

    #[test]
    fn claims_serialize_and_deserialize_roundtrip() {
        let c = sample_claims();
        let json = serde_json::to_string(&c).unwrap();
        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, c.id);
        assert_eq!(back.sub, c.sub);
        assert_eq!(back.exp, c.exp);
    }

    #[test]
    fn claims_embed_the_full_user_record() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        assert_eq!(json["sub"]["email"], "alice@example.com");
        assert_eq!(json["sub"]["password"], PASSWORD_REDACTED);
    }

    #[test]
    fn claims_json_contains_expected_keys() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        for key in &["id", "sub", "exp"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------
mod envelope_tests {
    use shared::types::ApiResponse;

    #[test]
    fn data_envelope_has_message_and_data() {
        let env = ApiResponse::with_data("Users found successfully", vec![1, 2, 3]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["message"], "Users found successfully");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn message_only_envelope_serializes_null_data() {
        let env = ApiResponse::message_only("User not found");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["message"], "User not found");
        assert!(json["data"].is_null());
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------
mod config_tests {
    use shared::types::server_config::AppConfig;

    const SAMPLE: &str = r#"
        [server]
        bind = "127.0.0.1"

        [database]
        url = "sqlite://invitations.db?mode=rwc"

        [security]
        allowed_origins = ["http://localhost:3000"]

        [security.rate_limit]

        [auth]
    "#;

    #[test]
    fn defaults_fill_in_omitted_fields() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 1337);
        assert_eq!(cfg.server.max_connections, 1000);
        assert_eq!(cfg.security.api_prefix, "/api");
        assert_eq!(cfg.security.rate_limit.window_ms, 60_000);
        assert_eq!(cfg.security.rate_limit.max, 100);
        assert_eq!(cfg.auth.access_expiry_secs, 900);
        assert_eq!(cfg.auth.refresh_expiry_secs, 86_400);
    }

    #[test]
    fn addr_joins_bind_and_port() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:1337");
    }

    #[test]
    fn window_converts_to_duration() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.security.rate_limit.window().as_secs(), 60);
    }
}
