use figment::Jail;
use cast_config::CastConfig;
use pretty_assertions::assert_eq;

#[test]
fn prefixed_env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("TGCAST_SERVER__PORT", "7000");
        jail.set_env("TGCAST_TELEGRAM__API_BASE", "http://mock:9000");
        jail.set_env("TGCAST_DISPATCH__RESUME_ON_START", "false");

        let config = CastConfig::load().expect("config loads");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.telegram.api_base, "http://mock:9000");
        assert!(!config.dispatch.resume_on_start);
        Ok(())
    });
}

#[test]
fn bare_port_env_sets_server_port() {
    Jail::expect_with(|jail| {
        jail.set_env("PORT", "8088");

        let config = CastConfig::load().expect("config loads");
        assert_eq!(config.server.port, 8088);
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_bare_port() {
    Jail::expect_with(|jail| {
        jail.set_env("PORT", "8088");
        jail.set_env("TGCAST_SERVER__PORT", "9099");

        let config = CastConfig::load().expect("config loads");
        assert_eq!(config.server.port, 9099);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("tgcast.toml", "[store]\npath = \"from-file.json\"\n")?;
        jail.set_env("TGCAST_STORE__PATH", "from-env.json");

        let config = CastConfig::load().expect("config loads");
        assert_eq!(config.store.path, "from-env.json");
        Ok(())
    });
}
