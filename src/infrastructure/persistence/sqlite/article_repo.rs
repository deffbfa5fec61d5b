//! SQLite Article Repository（含点赞）

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{db_error, format_timestamp, parse_timestamp, DbPool};
use crate::application::ports::{
    ArticleChanges, ArticleRecord, ArticleRepositoryPort, ArticleWithLikes, LikeRecord,
    NewArticle, RepositoryError,
};
use crate::domain::pagination::fold_case;
use crate::domain::{OrderBy, PageRequest};

const ARTICLE_COLUMNS: &str =
    "a.id, a.title, a.content, a.image, a.user_id, a.created_at, a.updated_at";

/// 点赞统计列，需绑定一个查看者 id（匿名时为 NULL）
const LIKE_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM likes l WHERE l.article_id = a.id) AS like_count,
    EXISTS(SELECT 1 FROM likes l WHERE l.article_id = a.id AND l.user_id = ?) AS liked_by_viewer
"#;

/// 标题关键字过滤（比较折叠列），同一个模式绑定两次
const KEYWORD_FILTER: &str = r"(? IS NULL OR a.title_folded LIKE ? ESCAPE '\')";

/// SQLite Article Repository
pub struct SqliteArticleRepository {
    pool: DbPool,
}

impl SqliteArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::Recent => "a.created_at DESC, a.id DESC",
        OrderBy::Oldest => "a.id ASC",
    }
}

#[derive(FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    content: String,
    image: Option<String>,
    user_id: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ArticleRow> for ArticleRecord {
    type Error = RepositoryError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(ArticleRecord {
            id: row.id,
            title: row.title,
            content: row.content,
            image: row.image,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ArticleWithLikesRow {
    #[sqlx(flatten)]
    article: ArticleRow,
    like_count: i64,
    liked_by_viewer: bool,
}

impl TryFrom<ArticleWithLikesRow> for ArticleWithLikes {
    type Error = RepositoryError;

    fn try_from(row: ArticleWithLikesRow) -> Result<Self, Self::Error> {
        Ok(ArticleWithLikes {
            article: row.article.try_into()?,
            like_count: row.like_count,
            liked_by_viewer: row.liked_by_viewer,
        })
    }
}

#[derive(FromRow)]
struct LikeRow {
    id: i64,
    article_id: i64,
    user_id: i64,
    created_at: String,
}

impl TryFrom<LikeRow> for LikeRecord {
    type Error = RepositoryError;

    fn try_from(row: LikeRow) -> Result<Self, Self::Error> {
        Ok(LikeRecord {
            id: row.id,
            article_id: row.article_id,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl ArticleRepositoryPort for SqliteArticleRepository {
    async fn create(&self, article: &NewArticle) -> Result<ArticleRecord, RepositoryError> {
        let now = format_timestamp(Utc::now());
        let id = sqlx::query(
            r#"
            INSERT INTO articles (title, title_folded, content, image, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(fold_case(&article.title))
        .bind(&article.content)
        .bind(&article.image)
        .bind(article.user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("article {}", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepositoryError> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM articles a WHERE a.id = ?",
            ARTICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ArticleRecord::try_from).transpose()
    }

    async fn find_with_likes(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Option<ArticleWithLikes>, RepositoryError> {
        let row: Option<ArticleWithLikesRow> = sqlx::query_as(&format!(
            "SELECT {}, {} FROM articles a WHERE a.id = ?",
            ARTICLE_COLUMNS, LIKE_COLUMNS
        ))
        .bind(viewer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ArticleWithLikes::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: &PageRequest,
        viewer_id: Option<i64>,
    ) -> Result<Vec<ArticleWithLikes>, RepositoryError> {
        let keyword = page.keyword_pattern();
        let sql = format!(
            "SELECT {}, {} FROM articles a WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            ARTICLE_COLUMNS,
            LIKE_COLUMNS,
            KEYWORD_FILTER,
            order_clause(page.order_by)
        );

        let rows: Vec<ArticleWithLikesRow> = sqlx::query_as(&sql)
            .bind(viewer_id)
            .bind(&keyword)
            .bind(&keyword)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(ArticleWithLikes::try_from).collect()
    }

    async fn count(&self, page: &PageRequest) -> Result<i64, RepositoryError> {
        let keyword = page.keyword_pattern();
        let sql = format!("SELECT COUNT(*) FROM articles a WHERE {}", KEYWORD_FILTER);

        let count: (i64,) = sqlx::query_as(&sql)
            .bind(&keyword)
            .bind(&keyword)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count.0)
    }

    async fn update(
        &self,
        id: i64,
        changes: &ArticleChanges,
    ) -> Result<ArticleRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                title = COALESCE(?, title),
                title_folded = COALESCE(?, title_folded),
                content = COALESCE(?, content),
                image = CASE WHEN ? THEN ? ELSE image END,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(changes.title.as_deref().map(fold_case))
        .bind(&changes.content)
        .bind(changes.image.is_some())
        .bind(changes.image.as_ref().and_then(|image| image.as_deref()))
        .bind(format_timestamp(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("article {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("article {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM likes WHERE article_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM comments WHERE article_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn find_like(
        &self,
        article_id: i64,
        user_id: i64,
    ) -> Result<Option<LikeRecord>, RepositoryError> {
        let row: Option<LikeRow> = sqlx::query_as(
            "SELECT id, article_id, user_id, created_at FROM likes WHERE article_id = ? AND user_id = ?",
        )
        .bind(article_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(LikeRecord::try_from).transpose()
    }

    async fn create_like(
        &self,
        article_id: i64,
        user_id: i64,
    ) -> Result<LikeRecord, RepositoryError> {
        let created_at = Utc::now();
        let id = sqlx::query("INSERT INTO likes (article_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(user_id)
            .bind(format_timestamp(created_at))
            .execute(&self.pool)
            .await
            .map_err(db_error)?
            .last_insert_rowid();

        Ok(LikeRecord {
            id,
            article_id,
            user_id,
            created_at,
        })
    }

    async fn delete_like(&self, like_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM likes WHERE id = ?")
            .bind(like_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
