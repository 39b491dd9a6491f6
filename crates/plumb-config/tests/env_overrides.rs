//! Environment layering, run inside `figment::Jail` so variables never leak
//! between tests.

use figment::Jail;
use plumb_config::{ConfigError, PlumbConfig};

#[test]
fn prefixed_env_sets_nested_fields() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("PLUMB_OPENAI__API_KEY", "sk-from-prefixed");
        jail.set_env("PLUMB_OPENAI__MODEL", "gpt-4o-mini");
        jail.set_env("PLUMB_WIZARD__INTERVIEW", "true");

        let config = PlumbConfig::load().expect("config loads");
        assert_eq!(config.openai.api_key, "sk-from-prefixed");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert!(config.wizard.interview);
        Ok(())
    });
}

#[test]
fn conventional_key_variable_is_accepted() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("OPENAI_API_KEY", "sk-conventional");

        let config = PlumbConfig::load().expect("config loads");
        assert!(config.openai.is_configured());
        assert_eq!(config.openai.api_key, "sk-conventional");
        Ok(())
    });
}

#[test]
fn prefixed_key_beats_conventional_key() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("OPENAI_API_KEY", "sk-conventional");
        jail.set_env("PLUMB_OPENAI__API_KEY", "sk-prefixed");

        let config = PlumbConfig::load().expect("config loads");
        assert_eq!(config.openai.api_key, "sk-prefixed");
        Ok(())
    });
}

#[test]
fn no_credential_anywhere_is_unconfigured() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        let config = PlumbConfig::load().expect("config loads");
        assert!(!config.openai.is_configured());
        Ok(())
    });
}

#[test]
fn invalid_year_bounds_fail_validation() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("PLUMB_WIZARD__MIN_YEAR", "2030");

        let err = PlumbConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
