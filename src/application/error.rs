//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，在 HTTP 边界处一次性映射为状态码

use thiserror::Error;

use crate::application::ports::{PasswordError, RepositoryError, TokenError};
use crate::domain::{NotOwner, ValidationError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} with id {id} not found")]
    NotFound {
        resource_type: &'static str,
        id: i64,
    },

    /// 输入校验错误
    #[error("{0}")]
    ValidationError(String),

    /// 业务前置条件不满足（如重复点赞）
    #[error("{0}")]
    BadRequest(String),

    /// 未认证或凭证无效
    #[error("{0}")]
    Unauthorized(String),

    /// 已认证但无权限
    #[error("{0}")]
    Forbidden(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建业务前置条件错误
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// 创建未认证错误
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<NotOwner> for ApplicationError {
    fn from(err: NotOwner) -> Self {
        Self::Forbidden(err.to_string())
    }
}

impl From<ValidationError> for ApplicationError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<PasswordError> for ApplicationError {
    fn from(err: PasswordError) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<TokenError> for ApplicationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => Self::InternalError(msg),
            TokenError::Expired | TokenError::Invalid(_) => Self::unauthorized("Unauthorized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = ApplicationError::not_found("article", 42);
        assert_eq!(err.to_string(), "article with id 42 not found");
    }

    #[test]
    fn test_not_owner_becomes_forbidden() {
        let err: ApplicationError = NotOwner { resource: "comment" }.into();
        assert!(matches!(err, ApplicationError::Forbidden(ref m) if m == "Should be the owner of the comment"));
    }

    #[test]
    fn test_token_failures_are_unauthorized() {
        let err: ApplicationError = TokenError::Expired.into();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
        let err: ApplicationError = TokenError::Signing("bad key".into()).into();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }
}
