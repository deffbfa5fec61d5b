//! Comment HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{DeleteComment, UpdateComment};
use crate::infrastructure::http::auth::AuthUser;
use crate::infrastructure::http::dto::{CommentResponse, UpdateCommentRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{IdPath, ValidJson};
use crate::infrastructure::http::state::AppState;

pub async fn update_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(comment_id): IdPath,
    ValidJson(req): ValidJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = state
        .update_comment_handler
        .handle(UpdateComment {
            comment_id,
            user_id: user.id,
            content: req.content,
        })
        .await?;

    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(comment_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .delete_comment_handler
        .handle(DeleteComment {
            comment_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
