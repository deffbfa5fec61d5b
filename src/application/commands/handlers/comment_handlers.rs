//! Comment Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteComment, UpdateComment};
use crate::application::error::ApplicationError;
use crate::application::ports::{CommentChanges, CommentRecord, CommentRepositoryPort};
use crate::domain::ensure_owner;

async fn require_comment(
    repo: &dyn CommentRepositoryPort,
    comment_id: i64,
) -> Result<CommentRecord, ApplicationError> {
    repo.find_by_id(comment_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("comment", comment_id))
}

pub struct UpdateCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl UpdateCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: UpdateComment) -> Result<CommentRecord, ApplicationError> {
        let existing = require_comment(self.comment_repo.as_ref(), command.comment_id).await?;
        ensure_owner(&existing, command.user_id)?;

        let comment = self
            .comment_repo
            .update(
                existing.id,
                &CommentChanges {
                    content: command.content,
                },
            )
            .await?;

        tracing::info!(comment_id = comment.id, "Comment updated");

        Ok(comment)
    }
}

pub struct DeleteCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl DeleteCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: DeleteComment) -> Result<(), ApplicationError> {
        let existing = require_comment(self.comment_repo.as_ref(), command.comment_id).await?;
        ensure_owner(&existing, command.user_id)?;

        self.comment_repo.delete(existing.id).await?;

        tracing::info!(comment_id = existing.id, "Comment deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_non_owner_cannot_delete_comment() {
        let ctx = TestContext::new().await;
        let author = ctx.user("author@example.com").await;
        let other = ctx.user("other@example.com").await;
        let article = ctx.article(author.id, "Post").await;
        let comment = ctx.comment(article.id, author.id, "first").await;
        let handler = DeleteCommentHandler::new(ctx.comments.clone());

        let err = handler
            .handle(DeleteComment {
                comment_id: comment.id,
                user_id: other.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(ref m) if m == "Should be the owner of the comment"));

        handler
            .handle(DeleteComment {
                comment_id: comment.id,
                user_id: author.id,
            })
            .await
            .unwrap();
        assert!(ctx.comments.find_by_id(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_without_content_keeps_comment() {
        let ctx = TestContext::new().await;
        let author = ctx.user("author@example.com").await;
        let article = ctx.article(author.id, "Post").await;
        let comment = ctx.comment(article.id, author.id, "original").await;
        let handler = UpdateCommentHandler::new(ctx.comments.clone());

        let updated = handler
            .handle(UpdateComment {
                comment_id: comment.id,
                user_id: author.id,
                content: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.content, "original");
    }
}
