use crate::config::models::AppConfig;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[database]
url = "postgres://miner:secret@db:5432/redditminer"
max_connections = 4
min_connections = 1
connection_timeout_seconds = 10
idle_timeout_seconds = 60

[scheduler]
tick_interval_seconds = 15
granularity = "week"
drain_on_stop = true
drain_timeout_seconds = 5
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let config = AppConfig::load(Some(path)).unwrap();

    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.scheduler.tick_interval_seconds, 15);
    assert_eq!(config.scheduler.drain_timeout_seconds, Some(5));
    // 未出现在文件中的段落使用默认值
    assert_eq!(config.reddit.base_url, "https://www.reddit.com");
}

#[test]
fn test_load_missing_file_fails() {
    let result = AppConfig::load(Some("/nonexistent/redditminer.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_rejects_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[scheduler]
tick_interval_seconds = 0
"#
    )
    .unwrap();

    let result = AppConfig::load(Some(file.path().to_str().unwrap()));
    assert!(result.is_err());
}

#[test]
fn test_config_environment_override() {
    env::set_var("REDDITMINER_REDDIT__LISTING_LIMIT", "42");

    let config = AppConfig::load(None);

    env::remove_var("REDDITMINER_REDDIT__LISTING_LIMIT");

    let config = config.unwrap();
    assert_eq!(config.reddit.listing_limit, 42);
}
