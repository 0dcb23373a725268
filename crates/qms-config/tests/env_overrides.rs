use figment::Jail;
use qms_config::{ConfigError, QmsConfig};

#[test]
fn env_overrides_autosave_delay() {
    Jail::expect_with(|jail| {
        jail.set_env("QMS_AUTOSAVE__DELAY_MS", "1500");
        jail.set_env("QMS_GENERAL__DATA_DIR", "/srv/audits");

        let config = QmsConfig::load_from(jail.directory()).expect("config loads");
        assert_eq!(config.autosave.delay_ms, 1500);
        assert_eq!(config.autosave.idle_revert_ms, 2_000);
        assert_eq!(config.general.data_dir, "/srv/audits");
        Ok(())
    });
}

#[test]
fn project_file_is_read_and_env_wins() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".qms")).expect("create .qms");
        jail.create_file(
            ".qms/config.toml",
            r#"
            [autosave]
            delay_ms = 5000
            max_auto_retries = 2

            [general]
            data_dir = "audit-data"
            "#,
        )?;
        jail.set_env("QMS_AUTOSAVE__DELAY_MS", "750");

        let config = QmsConfig::load_from(jail.directory()).expect("config loads");
        assert_eq!(config.autosave.delay_ms, 750);
        assert_eq!(config.autosave.max_auto_retries, 2);
        assert_eq!(config.general.data_dir, "audit-data");
        Ok(())
    });
}

#[test]
fn zero_delay_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("QMS_AUTOSAVE__DELAY_MS", "0");
        let error = QmsConfig::load_from(jail.directory()).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
