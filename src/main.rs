//! Marketboard - 社区文章 + 二手商品 REST 后端
//!
//! - Domain: pagination, ownership, validation
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, adapters

use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use marketboard::config::{load_config, print_config, AppConfig};
use marketboard::infrastructure::adapters::{
    Argon2PasswordHasher, FileImageStorage, JwtTokenService,
};
use marketboard::infrastructure::http::{AppState, HttpServer, Ports};
use marketboard::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig as PoolConfig, SqliteArticleRepository,
    SqliteCommentRepository, SqliteProductRepository, SqliteUserRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 只补充未设置的环境变量
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Marketboard v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录与静态资源目录存在
    if let Some(parent) = sqlite_file_path(&config.database.url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let pool_config = PoolConfig::new(&config.database.url, config.database.max_connections);
    let pool = create_pool(&pool_config).await?;
    run_migrations(&pool).await?;

    // 创建适配器
    let token_service = JwtTokenService::new(
        &config.auth.access_secret,
        &config.auth.refresh_secret,
        Duration::seconds(i64::try_from(config.auth.access_ttl_secs)?),
        Duration::seconds(i64::try_from(config.auth.refresh_ttl_secs)?),
    );
    let image_storage = FileImageStorage::new(&config.server.public_dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare public dir: {}", e))?;

    let ports = Ports {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        articles: Arc::new(SqliteArticleRepository::new(pool.clone())),
        comments: Arc::new(SqliteCommentRepository::new(pool.clone())),
        products: Arc::new(SqliteProductRepository::new(pool)),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(token_service),
        images: Arc::new(image_storage),
    };

    let server = HttpServer::new(AppState::new(config, ports));

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 日志：RUST_LOG 优先，否则使用 `log.level`
fn init_tracing(config: &AppConfig) {
    let fallback = format!(
        "{},marketboard={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// `sqlite:data/app.db?mode=rwc` -> `data/app.db`
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}
