//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 通用环境变量（DATABASE_URL、PORT 等）
//! 2. 带前缀的环境变量
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 通用环境变量 → 配置键
const PLAIN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("JWT_ACCESS_TOKEN_SECRET", "auth.access_secret"),
    ("JWT_REFRESH_TOKEN_SECRET", "auth.refresh_secret"),
    ("NODE_ENV", "server.environment"),
    ("PORT", "server.port"),
];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 通用环境变量（`DATABASE_URL`、`JWT_ACCESS_TOKEN_SECRET`、
///    `JWT_REFRESH_TOKEN_SECRET`、`NODE_ENV`、`PORT`）
/// 2. 环境变量（前缀 `MARKET_`，层级分隔符 `__`）
/// 3. 配置文件（config.toml 或 config.local.toml）
/// 4. 默认值
///
/// # 环境变量示例
/// - `MARKET_SERVER__PORT=8080`
/// - `MARKET_SERVER__PUBLIC_DIR=/srv/public`
/// - `MARKET_AUTH__ACCESS_TTL_SECS=900`
/// - `MARKET_UPLOAD__MAX_IMAGE_BYTES=1048576`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.environment", "development")?
        .set_default("server.public_dir", "public")?
        .set_default("server.public_path", "/public")?
        .set_default("database.url", "sqlite:data/marketboard.db?mode=rwc")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.access_ttl_secs", 3600)?
        .set_default("auth.refresh_ttl_secs", 7 * 24 * 3600)?
        .set_default("upload.max_image_bytes", 5 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加带前缀的环境变量
    // 前缀: MARKET_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("MARKET")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 通用环境变量（最高优先级）
    for (key, value) in plain_env_overrides(|name| std::env::var(name).ok()) {
        builder = builder.set_override(key, value)?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 收集已设置的通用环境变量，空值视为未设置
fn plain_env_overrides(
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<(&'static str, String)> {
    PLAIN_ENV_OVERRIDES
        .iter()
        .filter_map(|(var, key)| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*key, value))
        })
        .collect()
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database url cannot be empty".to_string(),
        ));
    }

    if config.auth.access_secret.is_empty() || config.auth.refresh_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "JWT access and refresh secrets must be set".to_string(),
        ));
    }

    let public_path = config.server.public_path.trim_end_matches('/');
    if !config.server.public_path.starts_with('/') || public_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Public path must start with '/' and cannot be the root".to_string(),
        ));
    }

    Ok(())
}

fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() {
        "(unset)"
    } else {
        "********"
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!(
        "Public Files: {:?} -> {}",
        config.server.public_dir,
        config.server.public_path
    );
    tracing::info!("Database: {}", config.database.url);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("JWT Access Secret: {}", mask_secret(&config.auth.access_secret));
    tracing::info!("JWT Refresh Secret: {}", mask_secret(&config.auth.refresh_secret));
    tracing::info!(
        "Token TTL: access={}s, refresh={}s",
        config.auth.access_ttl_secs,
        config.auth.refresh_ttl_secs
    );
    tracing::info!("Max Image Size: {} bytes", config.upload.max_image_bytes);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.access_secret = "access".into();
        config.auth.refresh_secret = "refresh".into();
        config
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_error_for_missing_secret() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_url() {
        let mut config = valid_config();
        config.database.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_relative_public_path() {
        let mut config = valid_config();
        config.server.public_path = "public".into();
        assert!(validate_config(&config).is_err());

        config.server.public_path = String::new();
        assert!(validate_config(&config).is_err());

        config.server.public_path = "/".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_plain_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("NODE_ENV", "  "),
        ]
        .into_iter()
        .collect();

        let overrides = plain_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(
            overrides,
            vec![
                ("database.url", "sqlite::memory:".to_string()),
                ("server.port", "8080".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 4000
environment = "production"

[auth]
access_secret = "a"
refresh_secret = "r"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert!(config.server.is_production());
        assert_eq!(config.auth.refresh_ttl_secs, 7 * 24 * 3600);
        assert_eq!(config.upload.max_image_bytes, 5 * 1024 * 1024);
    }
}
