//! Data Transfer Objects
//!
//! 请求结构体在此完成校验；响应结构体统一 camelCase，永不包含密码哈希

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{ArticleDetail, ArticleRecord, CommentRecord, ProductDetail, ProductRecord, UserRecord};
use crate::domain::pagination::{
    DEFAULT_CURSOR_LIMIT, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_CURSOR_LIMIT, MAX_PAGE_SIZE,
};
use crate::domain::{validation, CursorRequest, OrderBy, PageRequest, Validate, ValidationError};

const MAX_TITLE: usize = 200;
const MAX_CONTENT: usize = 10_000;
const MAX_COMMENT: usize = 2_000;
const MAX_NAME: usize = 100;
const MAX_NICKNAME: usize = 50;
const MAX_IMAGE_URL: usize = 2_048;

/// 区分字段缺省与显式 `null`：缺省走 `#[serde(default)]` 得到 `None`，
/// `null` 得到 `Some(None)`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Query DTOs
// ============================================================================

/// 偏移分页查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub order_by: Option<OrderBy>,
    pub keyword: Option<String>,
}

impl Validate for ListQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(page) = self.page {
            validation::range("page", page, 1, u32::MAX)?;
        }
        if let Some(page_size) = self.page_size {
            validation::range("pageSize", page_size, 1, MAX_PAGE_SIZE)?;
        }
        if let Some(keyword) = &self.keyword {
            if keyword.chars().count() > MAX_NAME {
                return Err(ValidationError::new(
                    "keyword",
                    format!("must be at most {} characters", MAX_NAME),
                ));
            }
        }
        Ok(())
    }
}

impl From<ListQuery> for PageRequest {
    fn from(query: ListQuery) -> Self {
        PageRequest {
            page: query.page.unwrap_or(DEFAULT_PAGE),
            page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            order_by: query.order_by.unwrap_or_default(),
            keyword: query.keyword,
        }
    }
}

/// 评论游标查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CommentListQuery {
    pub cursor: Option<i64>,
    pub limit: Option<u32>,
}

impl Validate for CommentListQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(cursor) = self.cursor {
            validation::range("cursor", cursor, 1, i64::MAX)?;
        }
        if let Some(limit) = self.limit {
            validation::range("limit", limit, 1, MAX_CURSOR_LIMIT)?;
        }
        Ok(())
    }
}

impl From<CommentListQuery> for CursorRequest {
    fn from(query: CommentListQuery) -> Self {
        CursorRequest {
            cursor: query.cursor,
            limit: query.limit.unwrap_or(DEFAULT_CURSOR_LIMIT),
        }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::email("email", &self.email)?;
        validation::text("nickname", &self.nickname, MAX_NICKNAME)?;
        validation::password("password", &self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::email("email", &self.email)?;
        validation::text("password", &self.password, 128)
    }
}

// ============================================================================
// Article DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

impl Validate for CreateArticleRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::text("title", &self.title, MAX_TITLE)?;
        validation::text("content", &self.content, MAX_CONTENT)?;
        validation::optional_text("image", self.image.as_deref(), MAX_IMAGE_URL)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `null` 清空图片
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
}

impl Validate for UpdateArticleRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::optional_text("title", self.title.as_deref(), MAX_TITLE)?;
        validation::optional_text("content", self.content.as_deref(), MAX_CONTENT)?;
        validation::optional_text(
            "image",
            self.image.as_ref().and_then(|image| image.as_deref()),
            MAX_IMAGE_URL,
        )
    }
}

// ============================================================================
// Comment DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::text("content", &self.content, MAX_COMMENT)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

impl Validate for UpdateCommentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::optional_text("content", self.content.as_deref(), MAX_COMMENT)
    }
}

// ============================================================================
// Product DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::text("name", &self.name, MAX_NAME)?;
        validation::text("description", &self.description, MAX_CONTENT)?;
        validation::range("price", self.price, 0, i64::MAX)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::optional_text("name", self.name.as_deref(), MAX_NAME)?;
        validation::optional_text("description", self.description.as_deref(), MAX_CONTENT)?;
        if let Some(price) = self.price {
            validation::range("price", price, 0, i64::MAX)?;
        }
        Ok(())
    }
}

// ============================================================================
// User DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub nickname: Option<String>,
    /// `null` 清空头像
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
}

impl Validate for UpdateMeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            validation::email("email", email)?;
        }
        validation::optional_text("nickname", self.nickname.as_deref(), MAX_NICKNAME)?;
        validation::optional_text(
            "image",
            self.image.as_ref().and_then(|image| image.as_deref()),
            MAX_IMAGE_URL,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::text("password", &self.password, 128)?;
        validation::password("newPassword", &self.new_password)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            image: user.image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleRecord> for ArticleResponse {
    fn from(article: ArticleRecord) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            image: article.image,
            user_id: article.user_id,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// 文章 + 点赞信息；匿名查看时不输出 isLiked
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub article: ArticleResponse,
    pub like_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

impl From<ArticleDetail> for ArticleDetailResponse {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            article: detail.article.into(),
            like_count: detail.like_count,
            is_liked: detail.is_liked,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentResponse {
    fn from(comment: CommentRecord) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            article_id: comment.article_id,
            user_id: comment.user_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            user_id: product.user_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// 商品 + 收藏信息；匿名查看时不输出 isFavorited
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub favorite_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            product: detail.product.into(),
            favorite_count: detail.favorite_count,
            is_favorited: detail.is_favorited,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn article() -> ArticleRecord {
        ArticleRecord {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            image: None,
            user_id: 9,
            created_at: at(),
            updated_at: at(),
        }
    }

    #[test]
    fn test_list_query_defaults() {
        let page: PageRequest = ListQuery::default().into();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.order_by, OrderBy::Oldest);
    }

    #[test]
    fn test_list_query_bounds() {
        let query = ListQuery {
            page_size: Some(101),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = ListQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_comment_limit_bounds() {
        let query = CommentListQuery {
            cursor: None,
            limit: Some(0),
        };
        assert!(query.validate().is_err());
        let request: CursorRequest = CommentListQuery::default().into();
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn test_update_image_absent_vs_null() {
        let absent: UpdateArticleRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(absent.image, None);

        let cleared: UpdateArticleRequest = serde_json::from_str(r#"{"image":null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));

        let replaced: UpdateMeRequest = serde_json::from_str(r#"{"image":"/public/a.png"}"#).unwrap();
        assert_eq!(replaced.image, Some(Some("/public/a.png".to_string())));
        assert!(replaced.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let request = CreateProductRequest {
            name: "Lamp".into(),
            description: "Light".into(),
            price: -1,
        };
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "price: must be between 0 and 9223372036854775807"
        );
    }

    #[test]
    fn test_anonymous_detail_omits_is_liked() {
        let json = serde_json::to_value(ArticleDetailResponse::from(ArticleDetail {
            article: article(),
            like_count: 2,
            is_liked: None,
        }))
        .unwrap();

        assert_eq!(json["likeCount"], 2);
        assert_eq!(json["userId"], 9);
        assert!(json.get("isLiked").is_none());
    }

    #[test]
    fn test_user_response_has_no_password() {
        let json = serde_json::to_value(UserResponse::from(UserRecord {
            id: 1,
            email: "a@example.com".into(),
            nickname: "a".into(),
            password_hash: "secret-hash".into(),
            image: None,
            created_at: at(),
            updated_at: at(),
        }))
        .unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }
}
