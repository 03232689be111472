//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use cast_config::CastConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_server_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
host = "127.0.0.1"
port = 8080
upload_dir = "/var/lib/tgcast/uploads"
"#,
        )?;

        let config: CastConfig = Figment::from(Serialized::defaults(CastConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.server.upload_dir, "/var/lib/tgcast/uploads");
        Ok(())
    });
}

#[test]
fn loads_dispatch_and_telegram_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[telegram]
api_base = "http://localhost:8081"
timeout_secs = 3

[dispatch]
pause_ms = 250
stop_grace_ms = 500
resume_on_start = false
default_delay_secs = 1.5
"#,
        )?;

        let config: CastConfig = Figment::from(Serialized::defaults(CastConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.telegram.api_base, "http://localhost:8081");
        assert_eq!(config.telegram.timeout_secs, 3);
        assert_eq!(config.dispatch.pause_ms, 250);
        assert_eq!(config.dispatch.stop_grace_ms, 500);
        assert!(!config.dispatch.resume_on_start);
        assert!((config.dispatch.default_delay_secs - 1.5).abs() < f64::EPSILON);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tgcast.toml",
            r#"
[store]
path = "data/tasks.json"

[cli]
server_url = "http://10.0.0.5:5000"
"#,
        )?;

        let config = CastConfig::load().expect("config loads");
        assert_eq!(config.store.path, "data/tasks.json");
        assert_eq!(config.cli.server_url, "http://10.0.0.5:5000");
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
port = 9000
"#,
        )?;

        let config: CastConfig = Figment::from(Serialized::defaults(CastConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dispatch.pause_ms, 100);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tgcast.toml",
            r#"
[telegram]
timeout_secs = 0
"#,
        )?;

        assert!(CastConfig::load().is_err());
        Ok(())
    });
}
