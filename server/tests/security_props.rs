//! Property tests for the pure admission checks.

use hyper::Method;
use proptest::prelude::*;

use server::handlers::http::routes::Router;
use server::security::{check_csrf, rate_limit_key, CsrfDecision, OriginValidator};

proptest! {
    #[test]
    fn listed_origins_are_always_allowed(origin in "[a-z]{1,10}://[a-z0-9.]{1,20}") {
        let validator = OriginValidator::new(vec![origin.clone()]);
        prop_assert!(validator.is_allowed(Some(&origin)));
    }

    #[test]
    fn unlisted_origins_are_rejected(origin in "https://[a-z0-9.]{1,20}") {
        let validator = OriginValidator::new(vec!["https://trusted.example.com".into()]);
        prop_assume!(origin != "https://trusted.example.com");
        prop_assert!(!validator.is_allowed(Some(&origin)));
    }

    #[test]
    fn any_extension_suffix_is_allowed(suffix in "[a-z0-9]{0,32}") {
        let validator = OriginValidator::new(vec![]);
        let origin = format!("chrome-extension://{suffix}");
        prop_assert!(validator.is_allowed(Some(&origin)));
    }

    #[test]
    fn rate_limit_keys_never_collide_across_identities(
        path in "/api/[a-z]{1,10}",
        a in "[0-9.]{1,15}",
        b in "[0-9.]{1,15}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(rate_limit_key(&path, &a), rate_limit_key(&path, &b));
    }

    #[test]
    fn safe_methods_never_need_a_token(origin in proptest::option::of("[ -~]{0,30}")) {
        let validator = OriginValidator::new(vec![]);
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            let decision = check_csrf(&method, origin.as_deref(), None, None, &validator);
            prop_assert_eq!(decision, CsrfDecision::Allowed);
        }
    }

    #[test]
    fn unsafe_methods_need_matching_tokens(token in "[a-zA-Z0-9]{1,32}") {
        let validator = OriginValidator::new(vec!["https://app.example.com".into()]);
        let decision = check_csrf(
            &Method::POST,
            Some("https://app.example.com"),
            Some(&token),
            Some(&token),
            &validator,
        );
        prop_assert_eq!(decision, CsrfDecision::Allowed);

        let mismatched = format!("{token}x");
        let decision = check_csrf(
            &Method::POST,
            Some("https://app.example.com"),
            Some(&token),
            Some(&mismatched),
            &validator,
        );
        prop_assert_eq!(decision, CsrfDecision::InvalidToken);
    }

    #[test]
    fn param_routes_match_any_single_segment(id in "[a-zA-Z0-9-]{1,36}") {
        let path = format!("/api/users/{id}");
        prop_assert!(Router::path_matches("/api/users/:id", &path));
        prop_assert_eq!(Router::path_param("/api/users/:id", &path), Some(id));
    }
}
