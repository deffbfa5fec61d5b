//! Auth Commands - 注册、登录、刷新令牌

#[derive(Debug, Clone)]
pub struct Register {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// 用刷新令牌换取新的令牌对
#[derive(Debug, Clone)]
pub struct RefreshTokens {
    pub refresh_token: String,
}
