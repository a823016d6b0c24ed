// ==========================================
// 配置解析集成测试
// ==========================================
// 解析顺序: 环境变量 → secrets 文件 → 致命错误
// ==========================================

use std::collections::HashMap;
use std::time::Duration;

use tempfile::TempDir;
use transfer_model::config::{env_keys, AppConfig, ConfigError};

fn lookup(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_env_dsn_wins_over_secrets() {
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("secrets.json");
    std::fs::write(&secrets, r#"{"PG_DSN": "postgres://from-file/db"}"#).unwrap();

    let config = AppConfig::from_lookup(lookup(&[
        (env_keys::PG_DSN, "postgres://from-env/db".to_string()),
        (env_keys::SECRETS_FILE, secrets.display().to_string()),
    ]))
    .unwrap();

    assert_eq!(config.pg_dsn, "postgres://from-env/db");
    assert_eq!(config.cache_ttl, Duration::from_secs(30));
    assert_eq!(config.pool_max_connections, 5);
    assert_eq!(config.locale, "en");
    assert_eq!(config.operator, "operator");
}

#[test]
fn test_secrets_file_fallback() {
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("secrets.json");
    std::fs::write(&secrets, r#"{"PG_DSN": "postgres://from-file/db"}"#).unwrap();

    let config = AppConfig::from_lookup(lookup(&[
        (env_keys::SECRETS_FILE, secrets.display().to_string()),
        (env_keys::CACHE_TTL_SECS, "5".to_string()),
    ]))
    .unwrap();

    assert_eq!(config.pg_dsn, "postgres://from-file/db");
    assert_eq!(config.cache_ttl, Duration::from_secs(5));
}

#[test]
fn test_missing_dsn_is_fatal() {
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("absent.json");

    let err = AppConfig::from_lookup(lookup(&[(
        env_keys::SECRETS_FILE,
        secrets.display().to_string(),
    )]))
    .unwrap_err();

    match err {
        ConfigError::MissingConnectionString { secrets_path } => {
            assert!(secrets_path.ends_with("absent.json"));
        }
        other => panic!("Expected MissingConnectionString, got {:?}", other),
    }
}

#[test]
fn test_invalid_numeric_value() {
    let err = AppConfig::from_lookup(lookup(&[
        (env_keys::PG_DSN, "postgres://x/db".to_string()),
        (env_keys::POOL_MAX, "lots".to_string()),
    ]))
    .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
