//! Article Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    CreateArticle, CreateComment, DeleteArticle, LikeArticle, UnlikeArticle, UpdateArticle,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArticleChanges, ArticleRecord, ArticleRepositoryPort, CommentRecord, CommentRepositoryPort,
    NewArticle, NewComment,
};
use crate::domain::ensure_owner;

/// 查找文章，不存在时返回 NotFound
pub(crate) async fn require_article(
    repo: &dyn ArticleRepositoryPort,
    article_id: i64,
) -> Result<ArticleRecord, ApplicationError> {
    repo.find_by_id(article_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("article", article_id))
}

// ============================================================================
// CreateArticle
// ============================================================================

pub struct CreateArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl CreateArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, command: CreateArticle) -> Result<ArticleRecord, ApplicationError> {
        let article = self
            .article_repo
            .create(&NewArticle {
                title: command.title,
                content: command.content,
                image: command.image,
                user_id: command.user_id,
            })
            .await?;

        tracing::info!(
            article_id = article.id,
            user_id = article.user_id,
            "Article created"
        );

        Ok(article)
    }
}

// ============================================================================
// UpdateArticle
// ============================================================================

pub struct UpdateArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl UpdateArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, command: UpdateArticle) -> Result<ArticleRecord, ApplicationError> {
        let existing = require_article(self.article_repo.as_ref(), command.article_id).await?;
        ensure_owner(&existing, command.user_id)?;

        let changes = ArticleChanges {
            title: command.title,
            content: command.content,
            image: command.image,
        };
        let article = self.article_repo.update(existing.id, &changes).await?;

        tracing::info!(article_id = article.id, "Article updated");

        Ok(article)
    }
}

// ============================================================================
// DeleteArticle
// ============================================================================

pub struct DeleteArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl DeleteArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, command: DeleteArticle) -> Result<(), ApplicationError> {
        let existing = require_article(self.article_repo.as_ref(), command.article_id).await?;
        ensure_owner(&existing, command.user_id)?;

        self.article_repo.delete(existing.id).await?;

        tracing::info!(article_id = existing.id, "Article deleted");

        Ok(())
    }
}

// ============================================================================
// CreateComment
// ============================================================================

pub struct CreateCommentHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl CreateCommentHandler {
    pub fn new(
        article_repo: Arc<dyn ArticleRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            article_repo,
            comment_repo,
        }
    }

    pub async fn handle(&self, command: CreateComment) -> Result<CommentRecord, ApplicationError> {
        let article = require_article(self.article_repo.as_ref(), command.article_id).await?;

        let comment = self
            .comment_repo
            .create(&NewComment {
                content: command.content,
                article_id: article.id,
                user_id: command.user_id,
            })
            .await?;

        tracing::info!(
            comment_id = comment.id,
            article_id = article.id,
            "Comment created"
        );

        Ok(comment)
    }
}

// ============================================================================
// LikeArticle / UnlikeArticle
// ============================================================================

/// 点赞
///
/// 先查再插不是原子操作：并发的重复点赞由 (article_id, user_id) 唯一约束拦截
pub struct LikeArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl LikeArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, command: LikeArticle) -> Result<(), ApplicationError> {
        let article = require_article(self.article_repo.as_ref(), command.article_id).await?;

        if self
            .article_repo
            .find_like(article.id, command.user_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::bad_request("Already liked"));
        }

        self.article_repo
            .create_like(article.id, command.user_id)
            .await?;

        tracing::info!(article_id = article.id, user_id = command.user_id, "Article liked");

        Ok(())
    }
}

pub struct UnlikeArticleHandler {
    article_repo: Arc<dyn ArticleRepositoryPort>,
}

impl UnlikeArticleHandler {
    pub fn new(article_repo: Arc<dyn ArticleRepositoryPort>) -> Self {
        Self { article_repo }
    }

    pub async fn handle(&self, command: UnlikeArticle) -> Result<(), ApplicationError> {
        let article = require_article(self.article_repo.as_ref(), command.article_id).await?;

        let like = self
            .article_repo
            .find_like(article.id, command.user_id)
            .await?
            .ok_or_else(|| ApplicationError::bad_request("Not liked"))?;

        self.article_repo.delete_like(like.id).await?;

        tracing::info!(article_id = article.id, user_id = command.user_id, "Article unliked");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_update_checks_existence_before_ownership() {
        let ctx = TestContext::new().await;
        let owner = ctx.user("owner@example.com").await;
        let other = ctx.user("other@example.com").await;
        let handler = UpdateArticleHandler::new(ctx.articles.clone());

        let err = handler
            .handle(UpdateArticle {
                article_id: 999,
                user_id: other.id,
                title: Some("x".into()),
                content: None,
                image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { resource_type: "article", id: 999 }));

        let article = ctx.article(owner.id, "Title").await;
        let err = handler
            .handle(UpdateArticle {
                article_id: article.id,
                user_id: other.id,
                title: Some("hijacked".into()),
                content: None,
                image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));

        let updated = handler
            .handle(UpdateArticle {
                article_id: article.id,
                user_id: owner.id,
                title: Some("Renamed".into()),
                content: None,
                image: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, article.content);
    }

    #[tokio::test]
    async fn test_like_twice_is_bad_request() {
        let ctx = TestContext::new().await;
        let user = ctx.user("liker@example.com").await;
        let article = ctx.article(user.id, "Likeable").await;
        let handler = LikeArticleHandler::new(ctx.articles.clone());
        let command = LikeArticle {
            article_id: article.id,
            user_id: user.id,
        };

        handler.handle(command.clone()).await.unwrap();
        let err = handler.handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "Already liked"));
    }

    #[tokio::test]
    async fn test_unlike_without_like_is_bad_request() {
        let ctx = TestContext::new().await;
        let user = ctx.user("liker@example.com").await;
        let article = ctx.article(user.id, "Likeable").await;
        let handler = UnlikeArticleHandler::new(ctx.articles.clone());

        let err = handler
            .handle(UnlikeArticle {
                article_id: article.id,
                user_id: user.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "Not liked"));
    }

    #[tokio::test]
    async fn test_comment_on_missing_article_is_not_found() {
        let ctx = TestContext::new().await;
        let user = ctx.user("writer@example.com").await;
        let handler = CreateCommentHandler::new(ctx.articles.clone(), ctx.comments.clone());

        let err = handler
            .handle(CreateComment {
                article_id: 7,
                user_id: user.id,
                content: "hello".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "article with id 7 not found");
    }
}
