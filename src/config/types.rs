//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 上传配置
    #[serde(default)]
    pub upload: UploadConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 运行环境，`production` 时 cookie 带 Secure
    #[serde(default = "default_environment")]
    pub environment: String,

    /// 静态文件目录（上传的图片也写到这里）
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// 静态文件 URL 前缀
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// 公开访问的 Base URL，用于拼接图片地址
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_public_path() -> String {
    "/public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            public_dir: default_public_dir(),
            public_path: default_public_path(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| {
                let host = if self.host == "0.0.0.0" {
                    "localhost"
                } else {
                    &self.host
                };
                format!("http://{}:{}", host, self.port)
            })
    }

    /// 静态资源目录下某个文件的公开 URL
    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}{}/{}",
            self.public_base_url(),
            self.public_path.trim_end_matches('/'),
            file_name
        )
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接串
    #[serde(default = "default_db_url")]
    pub url: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_url() -> String {
    "sqlite:data/marketboard.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 访问令牌签名密钥
    #[serde(default)]
    pub access_secret: String,

    /// 刷新令牌签名密钥
    #[serde(default)]
    pub refresh_secret: String,

    /// 访问令牌有效期（秒），同时作为 cookie Max-Age
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,

    /// 刷新令牌有效期（秒）
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,
}

fn default_access_ttl() -> u64 {
    3600 // 1 小时
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 3600 // 7 天
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_secs: default_access_ttl(),
            refresh_ttl_secs: default_refresh_ttl(),
        }
    }
}

/// 上传配置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 单张图片最大字节数
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024 // 5 MB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（未设置 RUST_LOG 时生效）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_path, "/public");
        assert_eq!(config.database.url, "sqlite:data/marketboard.db?mode=rwc");
        assert_eq!(config.auth.access_ttl_secs, 3600);
        assert!(!config.server.is_production());
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_public_url() {
        let mut config = ServerConfig::default();
        assert_eq!(
            config.public_url("a.png"),
            "http://localhost:3000/public/a.png"
        );

        config.base_url = Some("https://market.example.com/".into());
        assert_eq!(
            config.public_url("a.png"),
            "https://market.example.com/public/a.png"
        );
    }

    #[test]
    fn test_production_flag() {
        let config = ServerConfig {
            environment: "Production".into(),
            ..Default::default()
        };
        assert!(config.is_production());
    }
}
