use std::io::Write;

use super::*;

#[test]
fn defaults_match_core_constants() {
    let config = Config::default();
    assert!(config.xray.enabled);
    assert_eq!(config.xray.api_host, "127.0.0.1");
    assert_eq!(config.xray.api_port, 8080);
    assert_eq!(config.xray.stats_cron, "*/5 * * * *");
    assert_eq!(config.xray.stats_timeout_secs, 10);
    assert!(config.xray.reset_counters);
    assert_eq!(config.ingest.log_path, "/var/log/xray/access.log");
    assert_eq!(config.ingest.queue_capacity, 300);
    assert_eq!(config.ingest.batch_size, 10);
    assert!(config.mirror.url.is_none());
    validate_config(&config).unwrap();
}

#[test]
fn partial_toml_fills_defaults() {
    let config: Config = toml::from_str(
        r#"
[xray]
api_port = 10085

[ingest]
log_path = "/tmp/access.log"
server_name = "tokyo-1"

[mirror]
url = "https://d1.example.com/insert"
token = "secret"

[logging]
level = "debug"
format = "json"
filters = { xtally_ingest = "trace" }
"#,
    )
    .unwrap();

    assert_eq!(config.xray.api_port, 10085);
    assert_eq!(config.xray.api_host, "127.0.0.1");
    assert_eq!(config.ingest.log_path, "/tmp/access.log");
    assert_eq!(config.ingest.server_name.as_deref(), Some("tokyo-1"));
    assert_eq!(config.ingest.batch_size, 10);
    assert_eq!(config.mirror.timeout_secs, 30);
    assert_eq!(config.logging.filters["xtally_ingest"], "trace");
    validate_config(&config).unwrap();
}

#[test]
fn load_config_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&yaml).unwrap();
    writeln!(file, "xray:\n  stats_cron: \"0 * * * *\"").unwrap();
    let config = load_config(&yaml).unwrap();
    assert_eq!(config.xray.stats_cron, "0 * * * *");

    let json = dir.path().join("config.json");
    std::fs::write(&json, r#"{"database": {"url": "sqlite::memory:"}}"#).unwrap();
    let config = load_config(&json).unwrap();
    assert_eq!(config.database.url, "sqlite::memory:");

    let ini = dir.path().join("config.ini");
    std::fs::write(&ini, "").unwrap();
    assert!(matches!(
        load_config(&ini),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn load_or_default_without_path() {
    let config = load_or_default(None).unwrap();
    assert_eq!(config.database.url, "sqlite://xtally.db?mode=rwc");
}

#[test]
fn overrides_replace_file_values() {
    let mut config = Config::default();
    let overrides = CliOverrides {
        xray_api_host: Some("10.0.0.2".into()),
        xray_api_port: Some(10085),
        stats_cron: Some("0 */10 * * * *".into()),
        log_path: Some("/srv/xray/access.log".into()),
        server_name: Some("edge".into()),
        mirror_url: Some("https://mirror.example/insert".into()),
        mirror_token: Some("t0k".into()),
        log_level: Some("warn".into()),
        ..Default::default()
    };
    apply_overrides(&mut config, &overrides);

    assert_eq!(config.xray.endpoint(), "http://10.0.0.2:10085");
    assert_eq!(config.xray.stats_cron, "0 */10 * * * *");
    assert_eq!(config.ingest.log_path, "/srv/xray/access.log");
    assert_eq!(config.ingest.server_name.as_deref(), Some("edge"));
    assert_eq!(config.mirror.token.as_deref(), Some("t0k"));
    assert_eq!(config.logging.level.as_deref(), Some("warn"));
    validate_config(&config).unwrap();
}

#[test]
fn ipv6_endpoint_is_bracketed() {
    let mut config = Config::default();
    config.xray.api_host = "::1".into();
    assert_eq!(config.xray.endpoint(), "http://[::1]:8080");
}

#[test]
fn validation_rejects_bad_values() {
    let mut config = Config::default();
    config.xray.stats_cron = "every five minutes please".into();
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.ingest.batch_size = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.ingest.queue_capacity = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.mirror.url = Some("ftp://mirror".into());
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.logging.format = Some("xml".into());
    assert!(validate_config(&config).is_err());
}

#[test]
fn validation_parses_cron() {
    let mut config = Config::default();
    config.xray.stats_cron = "61 * * * *".into();
    let err = validate_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("stats_cron")));

    config.xray.stats_cron = "0 0 * * 0".into();
    validate_config(&config).unwrap();
    config.xray.stats_cron = "0 */10 * * * *".into();
    validate_config(&config).unwrap();
}

#[test]
fn disabled_sections_skip_validation() {
    let mut config = Config::default();
    config.ingest.enabled = false;
    config.ingest.batch_size = 0;
    config.xray.enabled = false;
    config.xray.stats_cron = String::new();
    validate_config(&config).unwrap();
}

#[test]
fn missing_file_names_the_path() {
    let err = load_config("/nonexistent/xtally.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/xtally.toml"));
}

#[test]
fn format_detection() {
    use std::path::Path;

    assert_eq!(
        ConfigFormat::from_path(Path::new("a.yml")),
        Some(ConfigFormat::Yaml)
    );
    assert_eq!(ConfigFormat::from_path(Path::new("a")), None);

    let config = parse_config("[database]\nmax_connections = 2", ConfigFormat::Toml).unwrap();
    assert_eq!(config.database.max_connections, 2);
}
