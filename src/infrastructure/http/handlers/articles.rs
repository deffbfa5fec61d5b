//! Article HTTP Handlers - 文章、文章评论与点赞

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{
    CreateArticle, CreateComment, DeleteArticle, GetArticle, LikeArticle, ListArticles,
    ListComments, UnlikeArticle, UpdateArticle,
};
use crate::domain::{CursorPage, Page};
use crate::infrastructure::http::auth::{AuthUser, MaybeAuthUser};
use crate::infrastructure::http::dto::{
    ArticleDetailResponse, ArticleResponse, CommentListQuery, CommentResponse,
    CreateArticleRequest, CreateCommentRequest, ListQuery, UpdateArticleRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{IdPath, ValidJson, ValidQuery};
use crate::infrastructure::http::state::AppState;

pub async fn create_article(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let article = state
        .create_article_handler
        .handle(CreateArticle {
            user_id: user.id,
            title: req.title,
            content: req.content,
            image: req.image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// 文章列表（偏移分页 + 标题关键字）
pub async fn list_articles(
    viewer: MaybeAuthUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Page<ArticleDetailResponse>>, ApiError> {
    let page = state
        .list_articles_handler
        .handle(ListArticles {
            page: query.into(),
            viewer_id: viewer.id(),
        })
        .await?;

    Ok(Json(page.map(ArticleDetailResponse::from)))
}

pub async fn get_article(
    viewer: MaybeAuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
) -> Result<Json<ArticleDetailResponse>, ApiError> {
    let detail = state
        .get_article_handler
        .handle(GetArticle {
            article_id,
            viewer_id: viewer.id(),
        })
        .await?;

    Ok(Json(detail.into()))
}

pub async fn update_article(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
    ValidJson(req): ValidJson<UpdateArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state
        .update_article_handler
        .handle(UpdateArticle {
            article_id,
            user_id: user.id,
            title: req.title,
            content: req.content,
            image: req.image,
        })
        .await?;

    Ok(Json(article.into()))
}

pub async fn delete_article(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .delete_article_handler
        .handle(DeleteArticle {
            article_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .create_comment_handler
        .handle(CreateComment {
            article_id,
            user_id: user.id,
            content: req.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// 评论列表（游标分页，最新在前）
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
    ValidQuery(query): ValidQuery<CommentListQuery>,
) -> Result<Json<CursorPage<CommentResponse>>, ApiError> {
    let page = state
        .list_comments_handler
        .handle(ListComments {
            article_id,
            cursor: query.into(),
        })
        .await?;

    Ok(Json(page.map(CommentResponse::from)))
}

pub async fn like_article(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .like_article_handler
        .handle(LikeArticle {
            article_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn unlike_article(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(article_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .unlike_article_handler
        .handle(UnlikeArticle {
            article_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
