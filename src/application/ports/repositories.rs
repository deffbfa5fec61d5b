//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{CursorRequest, Owned, PageRequest};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}

/// 用户资料修改，`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nickname: Option<String>,
    /// `None` 不修改，`Some(None)` 清空
    pub image: Option<Option<String>>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<UserRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserRecord, RepositoryError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), RepositoryError>;
}

// ============================================================================
// Article Repository (含点赞)
// ============================================================================

/// 文章实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for ArticleRecord {
    const RESOURCE: &'static str = "article";

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// 带点赞统计的文章
#[derive(Debug, Clone)]
pub struct ArticleWithLikes {
    pub article: ArticleRecord,
    pub like_count: i64,
    /// 当前查看者是否已点赞（匿名查看者恒为 false）
    pub liked_by_viewer: bool,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `None` 不修改，`Some(None)` 清空
    pub image: Option<Option<String>>,
}

/// 点赞记录，(article_id, user_id) 唯一
#[derive(Debug, Clone)]
pub struct LikeRecord {
    pub id: i64,
    pub article_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Article Repository Port
#[async_trait]
pub trait ArticleRepositoryPort: Send + Sync {
    async fn create(&self, article: &NewArticle) -> Result<ArticleRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepositoryError>;

    /// 查找文章并附带点赞统计
    async fn find_with_likes(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Option<ArticleWithLikes>, RepositoryError>;

    /// 按标题关键字过滤的偏移分页
    async fn find_page(
        &self,
        page: &PageRequest,
        viewer_id: Option<i64>,
    ) -> Result<Vec<ArticleWithLikes>, RepositoryError>;

    /// 与 `find_page` 相同过滤条件下的总数
    async fn count(&self, page: &PageRequest) -> Result<i64, RepositoryError>;

    async fn update(&self, id: i64, changes: &ArticleChanges)
        -> Result<ArticleRecord, RepositoryError>;

    /// 删除文章（评论、点赞级联删除）
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    async fn find_like(
        &self,
        article_id: i64,
        user_id: i64,
    ) -> Result<Option<LikeRecord>, RepositoryError>;

    async fn create_like(&self, article_id: i64, user_id: i64)
        -> Result<LikeRecord, RepositoryError>;

    async fn delete_like(&self, like_id: i64) -> Result<(), RepositoryError>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// 评论实体（用于持久化）
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for CommentRecord {
    const RESOURCE: &'static str = "comment";

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub article_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub content: Option<String>,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    async fn create(&self, comment: &NewComment) -> Result<CommentRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepositoryError>;

    /// 按 (created_at DESC, id DESC) 从游标处开始取 `request.fetch_size()` 条
    ///
    /// 游标行本身包含在结果中；游标不属于该文章时返回空
    async fn find_by_article_from_cursor(
        &self,
        article_id: i64,
        request: &CursorRequest,
    ) -> Result<Vec<CommentRecord>, RepositoryError>;

    async fn update(&self, id: i64, changes: &CommentChanges)
        -> Result<CommentRecord, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

// ============================================================================
// Product Repository (含收藏)
// ============================================================================

/// 商品实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for ProductRecord {
    const RESOURCE: &'static str = "product";

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// 带收藏统计的商品
#[derive(Debug, Clone)]
pub struct ProductWithFavorites {
    pub product: ProductRecord,
    pub favorite_count: i64,
    pub favorited_by_viewer: bool,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

/// 商品列表范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// 全部商品
    All,
    /// 某用户发布的商品
    OwnedBy(i64),
    /// 某用户收藏的商品
    FavoritedBy(i64),
}

/// 收藏记录，(product_id, user_id) 唯一
#[derive(Debug, Clone)]
pub struct FavoriteRecord {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Product Repository Port
#[async_trait]
pub trait ProductRepositoryPort: Send + Sync {
    async fn create(&self, product: &NewProduct) -> Result<ProductRecord, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductRecord>, RepositoryError>;

    async fn find_with_favorites(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Option<ProductWithFavorites>, RepositoryError>;

    /// 按名称/描述关键字过滤（OR）的偏移分页
    async fn find_page(
        &self,
        scope: ProductScope,
        page: &PageRequest,
        viewer_id: Option<i64>,
    ) -> Result<Vec<ProductWithFavorites>, RepositoryError>;

    async fn count(&self, scope: ProductScope, page: &PageRequest) -> Result<i64, RepositoryError>;

    async fn update(&self, id: i64, changes: &ProductChanges)
        -> Result<ProductRecord, RepositoryError>;

    /// 删除商品（收藏级联删除）
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    async fn find_favorite(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<Option<FavoriteRecord>, RepositoryError>;

    async fn create_favorite(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<FavoriteRecord, RepositoryError>;

    async fn delete_favorite(&self, favorite_id: i64) -> Result<(), RepositoryError>;
}
