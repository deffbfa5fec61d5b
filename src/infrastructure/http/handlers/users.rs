//! User HTTP Handlers - 当前用户

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::products::list_scoped;
use crate::application::{ChangePassword, GetMe, ProductScope, UpdateMe};
use crate::domain::Page;
use crate::infrastructure::http::auth::AuthUser;
use crate::infrastructure::http::dto::{
    ChangePasswordRequest, ListQuery, ProductDetailResponse, UpdateMeRequest, UserResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ValidJson, ValidQuery};
use crate::infrastructure::http::state::AppState;

pub async fn get_me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserResponse>, ApiError> {
    let me = state.get_me_handler.handle(GetMe { user_id: user.id }).await?;
    Ok(Json(me.into()))
}

pub async fn update_me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let me = state
        .update_me_handler
        .handle(UpdateMe {
            user_id: user.id,
            email: req.email,
            nickname: req.nickname,
            image: req.image,
        })
        .await?;

    Ok(Json(me.into()))
}

pub async fn change_password(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .change_password_handler
        .handle(ChangePassword {
            user_id: user.id,
            password: req.password,
            new_password: req.new_password,
        })
        .await?;

    Ok(StatusCode::OK)
}

/// 我发布的商品
pub async fn list_my_products(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Page<ProductDetailResponse>>, ApiError> {
    list_scoped(&state, ProductScope::OwnedBy(user.id), query, Some(user.id)).await
}

/// 我收藏的商品
pub async fn list_my_favorites(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Page<ProductDetailResponse>>, ApiError> {
    list_scoped(&state, ProductScope::FavoritedBy(user.id), query, Some(user.id)).await
}
