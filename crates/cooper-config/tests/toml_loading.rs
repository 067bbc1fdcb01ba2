//! Integration tests for TOML + env configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use cooper_config::CooperConfig;
use pretty_assertions::assert_eq;

fn layered(file: &str) -> Figment {
    Figment::from(Serialized::defaults(CooperConfig::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("COOPER_").split("__"))
}

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/cooper/crm.db"
busy_timeout_ms = 250

[claim]
window_days = 60

[auth]
default_user = "ana@coopercard.com.br"
allowed_email_domain = "coopercard.com.br"

[general]
default_limit = 25
"#,
        )?;

        let config = CooperConfig::from_figment(&layered("config.toml"))
            .map_err(|e| e.to_string())?;

        assert_eq!(config.database.path, "/var/lib/cooper/crm.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.claim.window_days, 60);
        assert_eq!(config.auth.default_user, "ana@coopercard.com.br");
        assert!(config.auth.restricts_domain());
        assert_eq!(config.general.default_limit, 25);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[auth]
default_user = "bruno@coopercard.com.br"
"#,
        )?;

        let config = CooperConfig::from_figment(&layered("config.toml"))
            .map_err(|e| e.to_string())?;

        assert_eq!(config.claim.window_days, 90);
        assert_eq!(config.database.path, ".cooper/cooper.db");
        assert_eq!(config.general.default_limit, 100);
        assert_eq!(config.auth.default_user, "bruno@coopercard.com.br");

        let defaults = CooperConfig::default();
        assert_eq!(config.database, defaults.database);
        assert_eq!(config.claim, defaults.claim);
        assert_eq!(config.general, defaults.general);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[claim]
window_days = 60
"#,
        )?;
        jail.set_env("COOPER_CLAIM__WINDOW_DAYS", "120");
        jail.set_env("COOPER_DATABASE__PATH", ":memory:");

        let config = CooperConfig::from_figment(&layered("config.toml"))
            .map_err(|e| e.to_string())?;

        assert_eq!(config.claim.window_days, 120);
        assert!(config.database.is_in_memory());
        Ok(())
    });
}

#[test]
fn out_of_range_values_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
default_limit = 0
"#,
        )?;

        let result = CooperConfig::from_figment(&layered("config.toml"));
        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_default_chain() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cooper")?;
        jail.create_file(
            ".cooper/config.toml",
            r#"
[claim]
window_days = 45
"#,
        )?;

        let config = CooperConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.claim.window_days, 45);
        Ok(())
    });
}
