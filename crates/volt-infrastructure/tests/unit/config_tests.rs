//! Unit tests for configuration loading

use figment::Jail;
use std::time::Duration;
use volt_domain::error::Error;
use volt_infrastructure::ConfigLoader;
use volt_infrastructure::config::{AppConfig, validate_app_config};

const SAMPLE: &str = r#"
name = "checkout"
environment = "production"

[logging]
level = "warn"
json_format = true

[lifecycle]
startup_timeout = "5s"
shutdown_timeout = "2s"

[rate_limit]
requests = 10
window = "1m"

[http_services.github]
base_url = "https://api.github.com"
timeout = "10s"
max_retries = 5
retry_on_status = [429, 503]

[http_services.github.default_headers]
Accept = "application/vnd.github+json"

[databases.primary]
dsn = "host=db.internal user=checkout dbname=checkout"
max_open_conns = 20
max_idle_conns = 5
connect_timeout = "3s"
"#;

#[test]
fn test_defaults_without_file() {
    Jail::expect_with(|_jail| {
        let config = ConfigLoader::new()
            .with_config_path("missing.toml")
            .load()
            .unwrap();

        assert_eq!(config.name, "volt");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.lifecycle.startup_timeout, Duration::from_secs(30));
        assert!(config.http_services.is_empty());
        assert!(config.databases.is_empty());
        Ok(())
    });
}

#[test]
fn test_load_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("volt.toml", SAMPLE)?;

        let config = ConfigLoader::new()
            .with_config_path("volt.toml")
            .load()
            .unwrap();

        assert_eq!(config.name, "checkout");
        assert_eq!(config.environment, "production");
        assert!(config.logging.json_format);
        assert_eq!(config.lifecycle.shutdown_timeout, Duration::from_secs(2));
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert!(config.rate_limit.enabled);

        let github = &config.http_services["github"];
        assert_eq!(github.base_url.as_deref(), Some("https://api.github.com"));
        assert_eq!(github.timeout, Duration::from_secs(10));
        assert_eq!(github.max_retries, 5);
        assert_eq!(github.retry_on_status, vec![429, 503]);
        assert_eq!(
            github.default_headers.get("Accept").map(String::as_str),
            Some("application/vnd.github+json")
        );

        let primary = &config.databases["primary"];
        assert_eq!(primary.driver, "postgres");
        assert_eq!(primary.max_open_conns, 20);
        assert_eq!(primary.connect_timeout, Duration::from_secs(3));
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("volt.toml", SAMPLE)?;
        jail.set_env("VOLT_LOGGING__LEVEL", "debug");
        jail.set_env("VOLT_RATE_LIMIT__REQUESTS", "3");
        jail.set_env("VOLT_HTTP_SERVICES__GITHUB__MAX_RETRIES", "0");

        let config = ConfigLoader::new()
            .with_config_path("volt.toml")
            .load()
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.rate_limit.requests, 3);
        assert_eq!(config.http_services["github"].max_retries, 0);
        assert_eq!(config.name, "checkout");
        Ok(())
    });
}

#[test]
fn test_discovers_default_config_file() {
    Jail::expect_with(|jail| {
        jail.create_file("volt.toml", "name = \"discovered\"")?;

        let config = ConfigLoader::new().load().unwrap();

        assert_eq!(config.name, "discovered");
        Ok(())
    });
}

#[test]
fn test_custom_env_prefix() {
    Jail::expect_with(|jail| {
        jail.set_env("CHECKOUT_ENVIRONMENT", "staging");

        let config = ConfigLoader::new()
            .with_config_path("missing.toml")
            .with_env_prefix("CHECKOUT")
            .load()
            .unwrap();

        assert_eq!(config.environment, "staging");
        Ok(())
    });
}

#[test]
fn test_malformed_duration_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("volt.toml", "[lifecycle]\nstartup_timeout = \"soon\"\n")?;

        let result = ConfigLoader::new().with_config_path("volt.toml").load();

        assert!(matches!(result, Err(Error::Configuration { .. })));
        Ok(())
    });
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.logging.level = "loud".to_string();
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.lifecycle.shutdown_timeout = Duration::ZERO;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.rate_limit.window = Duration::ZERO;
    assert!(validate_app_config(&config).is_err());
    config.rate_limit.enabled = false;
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_validation_names_the_offending_service() {
    Jail::expect_with(|jail| {
        jail.create_file("http.toml", "[http_services.billing]\nbase_url = \"not a url\"\n")?;
        jail.create_file("db.toml", "[databases.primary]\ndsn = \"\"\n")?;

        let err = ConfigLoader::new()
            .with_config_path("http.toml")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("billing"), "{err}");

        let err = ConfigLoader::new()
            .with_config_path("db.toml")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("primary"), "{err}");
        Ok(())
    });
}

#[test]
fn test_save_and_reload() {
    Jail::expect_with(|jail| {
        jail.create_file("volt.toml", SAMPLE)?;
        let original = ConfigLoader::new()
            .with_config_path("volt.toml")
            .load()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let loader = ConfigLoader::new().with_config_path(&path);
        loader.save_to_file(&original, &path).unwrap();
        let reloaded = loader.load().unwrap();

        assert_eq!(reloaded, original);
        Ok(())
    });
}
