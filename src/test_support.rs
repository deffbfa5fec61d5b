//! 测试辅助：内存数据库 + 真实适配器

use std::sync::Arc;

use argon2::Params;
use chrono::Duration;

use crate::application::ports::{
    ArticleRecord, ArticleRepositoryPort, CommentRecord, CommentRepositoryPort, NewArticle,
    NewComment, NewProduct, NewUser, PasswordHasherPort, ProductRecord, ProductRepositoryPort,
    TokenServicePort, UserRecord, UserRepositoryPort,
};
use crate::infrastructure::adapters::{Argon2PasswordHasher, JwtTokenService};
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteArticleRepository,
    SqliteCommentRepository, SqliteProductRepository, SqliteUserRepository,
};

/// `TestContext::user` 创建的用户的密码
pub const TEST_PASSWORD: &str = "password123";

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

pub fn test_hasher() -> Argon2PasswordHasher {
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None).unwrap();
    Argon2PasswordHasher::with_params(params)
}

pub fn test_token_service() -> JwtTokenService {
    JwtTokenService::new(
        TEST_ACCESS_SECRET,
        TEST_REFRESH_SECRET,
        Duration::hours(1),
        Duration::days(7),
    )
}

pub struct TestContext {
    pub pool: DbPool,
    pub users: Arc<dyn UserRepositoryPort>,
    pub articles: Arc<dyn ArticleRepositoryPort>,
    pub comments: Arc<dyn CommentRepositoryPort>,
    pub products: Arc<dyn ProductRepositoryPort>,
    pub hasher: Arc<dyn PasswordHasherPort>,
    pub tokens: Arc<dyn TokenServicePort>,
}

impl TestContext {
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        Self {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            articles: Arc::new(SqliteArticleRepository::new(pool.clone())),
            comments: Arc::new(SqliteCommentRepository::new(pool.clone())),
            products: Arc::new(SqliteProductRepository::new(pool.clone())),
            hasher: Arc::new(test_hasher()),
            tokens: Arc::new(test_token_service()),
            pool,
        }
    }

    pub async fn user(&self, email: &str) -> UserRecord {
        let password_hash = self.hasher.hash(TEST_PASSWORD).unwrap();
        self.users
            .create(&NewUser {
                email: email.to_string(),
                nickname: email.split('@').next().unwrap_or(email).to_string(),
                password_hash,
            })
            .await
            .unwrap()
    }

    pub async fn article(&self, user_id: i64, title: &str) -> ArticleRecord {
        self.articles
            .create(&NewArticle {
                title: title.to_string(),
                content: format!("{} content", title),
                image: None,
                user_id,
            })
            .await
            .unwrap()
    }

    pub async fn comment(&self, article_id: i64, user_id: i64, content: &str) -> CommentRecord {
        self.comments
            .create(&NewComment {
                content: content.to_string(),
                article_id,
                user_id,
            })
            .await
            .unwrap()
    }

    pub async fn product(&self, user_id: i64, name: &str, description: &str) -> ProductRecord {
        self.products
            .create(&NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                price: 1000,
                user_id,
            })
            .await
            .unwrap()
    }
}
