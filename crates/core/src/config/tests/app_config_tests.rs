use crate::config::models::{AppConfig, LogFormat};
use crate::models::Granularity;

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());

    // 验证默认值
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.database.min_connections, 2);
    assert_eq!(config.scheduler.tick_interval_seconds, 60);
    assert_eq!(config.scheduler.granularity, Granularity::Hour);
    assert_eq!(config.scheduler.max_in_flight, None);
    assert!(config.scheduler.drain_on_stop);
    assert!(!config.observability.metrics_enabled);
}

#[test]
fn test_config_from_toml() {
    let toml_content = r#"
[database]
url = "postgresql://test:5432/redditminer_test"
max_connections = 15
min_connections = 2
connection_timeout_seconds = 30
idle_timeout_seconds = 600

[scheduler]
tick_interval_seconds = 20
granularity = "day"
max_in_flight = 8
drain_on_stop = false

[reddit]
base_url = "http://127.0.0.1:8080"
user_agent = "redditminer-test"
request_timeout_seconds = 5
listing_limit = 25

[observability]
log_level = "debug"
log_format = "json"
metrics_enabled = true
metrics_bind_address = "127.0.0.1:9100"
"#;

    let config = AppConfig::from_toml(toml_content).unwrap();
    assert_eq!(config.database.max_connections, 15);
    assert_eq!(config.scheduler.tick_interval_seconds, 20);
    assert_eq!(config.scheduler.granularity, Granularity::Day);
    assert_eq!(config.scheduler.max_in_flight, Some(8));
    assert!(!config.scheduler.drain_on_stop);
    assert_eq!(config.scheduler.drain_timeout_seconds, Some(30));
    assert_eq!(config.reddit.listing_limit, 25);
    assert_eq!(config.observability.log_format, LogFormat::Json);
}

#[test]
fn test_partial_toml_uses_section_defaults() {
    let config = AppConfig::from_toml(
        r#"
[scheduler]
tick_interval_seconds = 5
"#,
    )
    .unwrap();

    assert_eq!(config.scheduler.tick_interval_seconds, 5);
    assert_eq!(config.scheduler.granularity, Granularity::Hour);
    assert_eq!(config.database.max_connections, 10);
}

#[test]
fn test_config_validation() {
    let mut config = AppConfig::default();
    config.scheduler.tick_interval_seconds = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.scheduler.max_in_flight = Some(0);
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.database.url = "mysql://localhost/redditminer".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.database.min_connections = 20;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.reddit.listing_limit = 500;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.observability.log_level = "verbose".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.observability.metrics_enabled = true;
    config.observability.metrics_bind_address = "not-an-address".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_toml_roundtrip_preserves_scheduler_section() {
    let mut config = AppConfig::default();
    config.scheduler.max_in_flight = Some(4);
    config.scheduler.granularity = Granularity::Week;

    let toml_str = config.to_toml().unwrap();
    let parsed = AppConfig::from_toml(&toml_str).unwrap();

    assert_eq!(parsed.scheduler.max_in_flight, Some(4));
    assert_eq!(parsed.scheduler.granularity, Granularity::Week);
    assert_eq!(parsed.scheduler.drain_timeout_seconds, Some(30));
}
