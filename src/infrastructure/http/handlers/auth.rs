//! Auth HTTP Handlers - 注册、登录、刷新、登出

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::application::{Login, RefreshTokens, Register};
use crate::infrastructure::http::auth::{
    clear_cookies, cookie_value, token_cookies, REFRESH_TOKEN_COOKIE,
};
use crate::infrastructure::http::dto::{LoginRequest, RegisterRequest, UserResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ValidJson;
use crate::infrastructure::http::state::AppState;

type SetCookies = AppendHeaders<[(HeaderName, HeaderValue); 2]>;

fn set_cookies([access, refresh]: [HeaderValue; 2]) -> SetCookies {
    AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, refresh)])
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .register_handler
        .handle(Register {
            email: req.email,
            nickname: req.nickname,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 登录，写入令牌 cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .login_handler
        .handle(Login {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookies = token_cookies(&state.config, &result.tokens)?;
    Ok((set_cookies(cookies), Json(UserResponse::from(result.user))))
}

/// 用刷新令牌 cookie 换取新的令牌对
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token =
        cookie_value(&headers, REFRESH_TOKEN_COOKIE).ok_or_else(ApiError::unauthorized)?;

    let tokens = state
        .refresh_tokens_handler
        .handle(RefreshTokens { refresh_token })
        .await?;

    let cookies = token_cookies(&state.config, &tokens)?;
    Ok((StatusCode::OK, set_cookies(cookies)))
}

/// 登出，清除令牌 cookie
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let cookies = clear_cookies(&state.config)?;
    Ok((StatusCode::NO_CONTENT, set_cookies(cookies)))
}
