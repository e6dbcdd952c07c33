use figment::Jail;
use shared::opendata::{CUMULATIVE_COUNTS_ENDPOINT, FACILITY_SURVEY_ENDPOINT};
use shared::{SETTINGS_FILE, load_config};

#[test]
fn defaults_fill_optional_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            SETTINGS_FILE,
            r#"
            [postgres]
            connection_string = "postgres://localhost/covid"
            "#,
        )?;

        let config = load_config().map_err(|e| e.to_string())?;
        assert_eq!(config.postgres.connection_string, "postgres://localhost/covid");
        assert_eq!(config.postgres.max_connections, 5);
        assert_eq!(config.source.cumulative_endpoint, CUMULATIVE_COUNTS_ENDPOINT);
        assert_eq!(config.source.survey_endpoint, FACILITY_SURVEY_ENDPOINT);
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert!(config.scheduler.is_none());
        Ok(())
    });
}

#[test]
fn env_overrides_settings_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            SETTINGS_FILE,
            r#"
            [postgres]
            connection_string = "postgres://localhost/covid"
            "#,
        )?;
        jail.set_env(
            "COVID_INGEST__POSTGRES__CONNECTION_STRING",
            "postgres://db.internal/covid",
        );
        jail.set_env("COVID_INGEST__SCHEDULER__INTERVAL_SECONDS", "3600");

        let config = load_config().map_err(|e| e.to_string())?;
        assert_eq!(config.postgres.connection_string, "postgres://db.internal/covid");
        assert_eq!(config.scheduler.map(|s| s.interval_seconds), Some(3600));
        Ok(())
    });
}

#[test]
fn missing_postgres_section_is_an_error() {
    Jail::expect_with(|_jail| {
        assert!(load_config().is_err());
        Ok(())
    });
}
