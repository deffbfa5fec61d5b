//! Credential Ports - 令牌签发与密码哈希
//!
//! 签名算法与哈希算法由 infrastructure/adapters 提供

use thiserror::Error;

/// 一对访问令牌与刷新令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// 令牌服务端口
pub trait TokenServicePort: Send + Sync {
    /// 为用户签发新的令牌对
    fn issue(&self, user_id: i64) -> Result<TokenPair, TokenError>;

    /// 校验访问令牌，返回用户 ID
    fn verify_access(&self, token: &str) -> Result<i64, TokenError>;

    /// 校验刷新令牌，返回用户 ID
    fn verify_refresh(&self, token: &str) -> Result<i64, TokenError>;
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid password hash: {0}")]
    MalformedHash(String),
}

/// 密码哈希端口
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// 匹配返回 `Ok(true)`，不匹配返回 `Ok(false)`
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}
