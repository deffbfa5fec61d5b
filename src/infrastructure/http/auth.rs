//! Cookie 认证
//!
//! - `AuthUser`: 必须登录，否则 401
//! - `MaybeAuthUser`: 可选登录，凭证无效时视为匿名
//!
//! 提取器放在 handler 参数的最前面，认证失败先于其它校验返回

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use std::sync::Arc;

use super::{error::ApiError, state::AppState};
use crate::application::{ApplicationError, TokenPair};
use crate::config::AppConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh-token";

/// 已认证用户
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

/// 可选认证用户
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<i64> {
        self.0.map(|user| user.id)
    }
}

/// 从 Cookie 头中读取指定 cookie
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// 校验访问令牌并确认用户仍存在
///
/// 令牌无效返回 `Ok(None)`；仓储故障向上传播
async fn resolve_user(state: &AppState, token: &str) -> Result<Option<AuthUser>, ApiError> {
    let user_id = match state.token_service.verify_access(token) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(reason = %e, "Access token rejected");
            return Ok(None);
        }
    };

    let user = state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(ApplicationError::from)?;

    if user.is_none() {
        tracing::debug!(user_id, "Access token subject no longer exists");
    }

    Ok(user.map(|u| AuthUser { id: u.id }))
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token =
            cookie_value(&parts.headers, ACCESS_TOKEN_COOKIE).ok_or_else(ApiError::unauthorized)?;

        resolve_user(state, &token)
            .await?
            .ok_or_else(ApiError::unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match cookie_value(&parts.headers, ACCESS_TOKEN_COOKIE) {
            Some(token) => Ok(MaybeAuthUser(resolve_user(state, &token).await?)),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

// ============================================================================
// Set-Cookie
// ============================================================================

fn build_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn header_value(cookie: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))
}

/// 登录/刷新时写入两个令牌 cookie
pub fn token_cookies(config: &AppConfig, tokens: &TokenPair) -> Result<[HeaderValue; 2], ApiError> {
    let secure = config.server.is_production();
    Ok([
        header_value(build_cookie(
            ACCESS_TOKEN_COOKIE,
            &tokens.access_token,
            config.auth.access_ttl_secs,
            secure,
        ))?,
        header_value(build_cookie(
            REFRESH_TOKEN_COOKIE,
            &tokens.refresh_token,
            config.auth.refresh_ttl_secs,
            secure,
        ))?,
    ])
}

/// 登出时清除两个令牌 cookie
pub fn clear_cookies(config: &AppConfig) -> Result<[HeaderValue; 2], ApiError> {
    let secure = config.server.is_production();
    Ok([
        header_value(build_cookie(ACCESS_TOKEN_COOKIE, "", 0, secure))?,
        header_value(build_cookie(REFRESH_TOKEN_COOKIE, "", 0, secure))?,
    ])
}
