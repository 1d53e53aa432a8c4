use super::*;

/// # Safety
/// Only `from_env_defaults_and_overrides` reads these variables, so no
/// other test races it.
unsafe fn clear_gateway_env() {
    unsafe {
        std::env::remove_var("PUBLIFLOW_API_URL");
        std::env::remove_var("PUBLIFLOW_UPLOADS_URL");
        std::env::remove_var("PORT");
        std::env::remove_var("COOKIE_SECURE");
        std::env::remove_var("PUBLIFLOW_REQUEST_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults_and_overrides() {
    unsafe { clear_gateway_env() };

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.uploads_url, DEFAULT_UPLOADS_URL);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

    // https backend turns Secure on unless COOKIE_SECURE says otherwise.
    unsafe { std::env::set_var("PUBLIFLOW_API_URL", "https://api.publiflow.test/api") };
    assert!(AppConfig::from_env().unwrap().cookie_secure);
    unsafe { std::env::set_var("COOKIE_SECURE", "false") };
    assert!(!AppConfig::from_env().unwrap().cookie_secure);

    unsafe { std::env::set_var("PUBLIFLOW_REQUEST_TIMEOUT_SECS", "12") };
    assert_eq!(AppConfig::from_env().unwrap().request_timeout, Duration::from_secs(12));
    for bad in ["soon", "0", "-5"] {
        unsafe { std::env::set_var("PUBLIFLOW_REQUEST_TIMEOUT_SECS", bad) };
        assert!(matches!(AppConfig::from_env(), Err(ConfigError::InvalidTimeout(v)) if v == bad), "{bad}");
    }

    unsafe { clear_gateway_env() };
}

#[test]
fn parse_base_url_strips_trailing_slash() {
    assert_eq!(parse_base_url("X", "https://api.example.test/api/").unwrap(), "https://api.example.test/api");
}

#[test]
fn parse_base_url_rejects_relative_and_foreign_schemes() {
    assert!(matches!(parse_base_url("X", "/api"), Err(ConfigError::InvalidUrl { var: "X", .. })));
    assert!(matches!(parse_base_url("X", "ftp://files.test"), Err(ConfigError::InvalidUrl { .. })));
}

// =============================================================================
// env_bool — uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "YES", " on "].iter().enumerate() {
        let key = format!("__PF_TEST_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "No", "off"].iter().enumerate() {
        let key = format!("__PF_TEST_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_or_unset_returns_none() {
    let key = "__PF_TEST_EB_INVALID__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__PF_TEST_EB_SURELY_UNSET__"), None);
}
