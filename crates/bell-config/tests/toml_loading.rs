//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use bell_config::BellConfig;

#[test]
fn loads_general_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
timezone = "Europe/Vilnius"
log_filter = "bell_graph=debug"
"#,
        )?;

        let config: BellConfig = Figment::from(Serialized::defaults(BellConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.timezone, "Europe/Vilnius");
        assert_eq!(config.general.log_filter, "bell_graph=debug");
        assert_eq!(config.general.tz(), Ok(chrono_tz::Europe::Vilnius));
        Ok(())
    });
}

#[test]
fn loads_relationship_policy_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[relationships]
allow_nested_groups = true
",
        )?;

        let config: BellConfig = Figment::from(Serialized::defaults(BellConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.relationships.allow_nested_groups);
        assert_eq!(config.general.timezone, "UTC");
        Ok(())
    });
}

#[test]
fn loads_weekly_day_ids_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[timetable]
weekly_day_ids = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
"#,
        )?;

        let config: BellConfig = Figment::from(Serialized::defaults(BellConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.timetable.weekly_day_ids.len(), 6);
        assert_eq!(config.timetable.weekly_day_ids[5], "Sat");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
timezone = "Europe/Vilnius"
"#,
        )?;
        jail.set_env("BELL_GENERAL__TIMEZONE", "America/New_York");

        let config: BellConfig = Figment::from(Serialized::defaults(BellConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("BELL_").split("__"))
            .extract()?;

        assert_eq!(config.general.timezone, "America/New_York");
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".bell")?;
        jail.create_file(
            ".bell/config.toml",
            r#"
[general]
timezone = "Asia/Tokyo"
"#,
        )?;

        let config: BellConfig = BellConfig::figment().extract()?;
        assert_eq!(config.general.timezone, "Asia/Tokyo");
        Ok(())
    });
}

#[test]
fn load_from_file_layers_over_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "school.toml",
            r"
[relationships]
allow_nested_groups = true
",
        )?;

        let config = BellConfig::load_from_file("school.toml").expect("config loads");
        assert!(config.relationships.allow_nested_groups);
        assert_eq!(config.timetable.weekly_day_ids.len(), 5);
        Ok(())
    });
}

#[test]
fn invalid_timezone_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
timezone = "Europe/Atlantis"
"#,
        )?;

        let config: BellConfig = Figment::from(Serialized::defaults(BellConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.timezone"));
        assert!(err.to_string().contains("Europe/Atlantis"));
        Ok(())
    });
}
