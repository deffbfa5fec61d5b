//! SQLite Comment Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{db_error, format_timestamp, parse_timestamp, DbPool};
use crate::application::ports::{
    CommentChanges, CommentRecord, CommentRepositoryPort, NewComment, RepositoryError,
};
use crate::domain::CursorRequest;

const COMMENT_COLUMNS: &str = "id, content, article_id, user_id, created_at, updated_at";

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    article_id: i64,
    user_id: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: row.id,
            content: row.content,
            article_id: row.article_id,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<CommentRecord, RepositoryError> {
        let now = format_timestamp(Utc::now());
        let id = sqlx::query(
            r#"
            INSERT INTO comments (content, article_id, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.content)
        .bind(comment.article_id)
        .bind(comment.user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("comment {}", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepositoryError> {
        let row: Option<CommentRow> =
            sqlx::query_as(&format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(CommentRecord::try_from).transpose()
    }

    async fn find_by_article_from_cursor(
        &self,
        article_id: i64,
        request: &CursorRequest,
    ) -> Result<Vec<CommentRecord>, RepositoryError> {
        let rows: Vec<CommentRow> = match request.cursor {
            None => sqlx::query_as(&format!(
                r#"
                SELECT {} FROM comments
                WHERE article_id = ?
                ORDER BY created_at DESC, id DESC
                LIMIT ?
                "#,
                COMMENT_COLUMNS
            ))
            .bind(article_id)
            .bind(request.fetch_size())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?,
            Some(cursor) => {
                // 游标行的排序键；不在该文章下则没有可返回的内容
                let anchor: Option<(String,)> = sqlx::query_as(
                    "SELECT created_at FROM comments WHERE id = ? AND article_id = ?",
                )
                .bind(cursor)
                .bind(article_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

                let Some((anchor_created_at,)) = anchor else {
                    return Ok(Vec::new());
                };

                sqlx::query_as(&format!(
                    r#"
                    SELECT {} FROM comments
                    WHERE article_id = ?
                      AND (created_at < ? OR (created_at = ? AND id <= ?))
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                    COMMENT_COLUMNS
                ))
                .bind(article_id)
                .bind(&anchor_created_at)
                .bind(&anchor_created_at)
                .bind(cursor)
                .bind(request.fetch_size())
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?
            }
        };

        rows.into_iter().map(CommentRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &CommentChanges,
    ) -> Result<CommentRecord, RepositoryError> {
        let result = sqlx::query(
            "UPDATE comments SET content = COALESCE(?, content), updated_at = ? WHERE id = ?",
        )
        .bind(&changes.content)
        .bind(format_timestamp(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("comment {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("comment {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_cursor_row_is_included() {
        let ctx = TestContext::new().await;
        let user = ctx.user("writer@example.com").await;
        let article = ctx.article(user.id, "Thread").await;
        let a = ctx.comment(article.id, user.id, "a").await;
        let b = ctx.comment(article.id, user.id, "b").await;
        ctx.comment(article.id, user.id, "c").await;

        let rows = ctx
            .comments
            .find_by_article_from_cursor(
                article.id,
                &CursorRequest {
                    cursor: Some(b.id),
                    limit: 5,
                },
            )
            .await
            .unwrap();

        let ids: Vec<i64> = rows.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_cursor_from_other_article_yields_nothing() {
        let ctx = TestContext::new().await;
        let user = ctx.user("writer@example.com").await;
        let first = ctx.article(user.id, "first").await;
        let second = ctx.article(user.id, "second").await;
        ctx.comment(first.id, user.id, "on first").await;
        let foreign = ctx.comment(second.id, user.id, "on second").await;

        let rows = ctx
            .comments
            .find_by_article_from_cursor(
                first.id,
                &CursorRequest {
                    cursor: Some(foreign.id),
                    limit: 5,
                },
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetches_one_extra_row() {
        let ctx = TestContext::new().await;
        let user = ctx.user("writer@example.com").await;
        let article = ctx.article(user.id, "Thread").await;
        for i in 0..4 {
            ctx.comment(article.id, user.id, &format!("c{}", i)).await;
        }

        let rows = ctx
            .comments
            .find_by_article_from_cursor(
                article.id,
                &CursorRequest {
                    cursor: None,
                    limit: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_update_content() {
        let ctx = TestContext::new().await;
        let user = ctx.user("writer@example.com").await;
        let article = ctx.article(user.id, "Thread").await;
        let comment = ctx.comment(article.id, user.id, "before").await;

        let updated = ctx
            .comments
            .update(
                comment.id,
                &CommentChanges {
                    content: Some("after".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "after");
        assert_eq!(updated.created_at, comment.created_at);
    }
}
