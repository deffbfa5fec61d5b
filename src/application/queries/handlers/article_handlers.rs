//! Article Query Handlers

use std::sync::Arc;

use crate::application::commands::handlers::require_article;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArticleRecord, ArticleRepositoryPort, ArticleWithLikes, CommentRecord, CommentRepositoryPort,
};
use crate::application::queries::{GetArticle, ListArticles, ListComments};
use crate::domain::{CursorPage, Page};

// ============================================================================
// Response DTOs
// ============================================================================

/// 文章详情：点赞数 + 当前查看者是否点赞
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: ArticleRecord,
    pub like_count: i64,
    /// 匿名查看时为 None
    pub is_liked: Option<bool>,
}

impl ArticleDetail {
    fn for_viewer(row: ArticleWithLikes, viewer_id: Option<i64>) -> Self {
        Self {
            is_liked: viewer_id.map(|_| row.liked_by_viewer),
            like_count: row.like_count,
            article: row.article,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub struct GetArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl GetArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, query: GetArticle) -> Result<ArticleDetail, ApplicationError> {
        let row = self
            .article_repo
            .find_with_likes(query.article_id, query.viewer_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("article", query.article_id))?;

        Ok(ArticleDetail::for_viewer(row, query.viewer_id))
    }
}

pub struct ListArticlesHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl ListArticlesHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, query: ListArticles) -> Result<Page<ArticleDetail>, ApplicationError> {
        let total_count = self.article_repo.count(&query.page).await?;
        let rows = self
            .article_repo
            .find_page(&query.page, query.viewer_id)
            .await?;

        Ok(Page {
            list: rows
                .into_iter()
                .map(|row| ArticleDetail::for_viewer(row, query.viewer_id))
                .collect(),
            total_count,
        })
    }
}

/// 评论游标分页
///
/// 多取一条判断是否还有下一页，避免额外的存在性查询
pub struct ListCommentsHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ListCommentsHandler {
    pub fn new(
        article_repo: Arc<dyn ArticleRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            article_repo,
            comment_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListComments,
    ) -> Result<CursorPage<CommentRecord>, ApplicationError> {
        let article = require_article(self.article_repo.as_ref(), query.article_id).await?;

        let rows = self
            .comment_repo
            .find_by_article_from_cursor(article.id, &query.cursor)
            .await?;

        Ok(CursorPage::from_overfetch(rows, query.cursor.limit, |c| c.id))
    }
}
