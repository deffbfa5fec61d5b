//! Auth Command Handlers - 注册、登录、刷新令牌

use std::sync::Arc;

use super::user_handlers::{hash_password, verify_password};
use crate::application::commands::{Login, RefreshTokens, Register};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    NewUser, PasswordHasherPort, TokenPair, TokenServicePort, UserRecord, UserRepositoryPort,
};

pub struct RegisterHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl RegisterHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
        }
    }

    pub async fn handle(&self, command: Register) -> Result<UserRecord, ApplicationError> {
        if self.user_repo.find_by_email(&command.email).await?.is_some() {
            return Err(ApplicationError::bad_request("User already exists"));
        }

        let password_hash = hash_password(&self.password_hasher, command.password).await?;
        let user = self
            .user_repo
            .create(&NewUser {
                email: command.email,
                nickname: command.nickname,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }
}

/// 登录成功后的结果
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub user: UserRecord,
    pub tokens: TokenPair,
}

pub struct LoginHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
    token_service: Arc<dyn TokenServicePort>,
}

impl LoginHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
        token_service: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            token_service,
        }
    }

    /// 邮箱不存在与密码错误返回同一错误
    pub async fn handle(&self, command: Login) -> Result<LoginResponse, ApplicationError> {
        let user = self
            .user_repo
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("Invalid credentials"))?;

        let valid = verify_password(
            &self.password_hasher,
            command.password,
            user.password_hash.clone(),
        )
        .await?;
        if !valid {
            return Err(ApplicationError::unauthorized("Invalid credentials"));
        }

        let tokens = self.token_service.issue(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse { user, tokens })
    }
}

pub struct RefreshTokensHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    token_service: Arc<dyn TokenServicePort>,
}

impl RefreshTokensHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        token_service: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    pub async fn handle(&self, command: RefreshTokens) -> Result<TokenPair, ApplicationError> {
        let user_id = self
            .token_service
            .verify_refresh(&command.refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                ApplicationError::unauthorized("Unauthorized")
            })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("Unauthorized"))?;

        Ok(self.token_service.issue(user.id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestContext, TEST_PASSWORD};

    #[tokio::test]
    async fn test_register_then_login() {
        let ctx = TestContext::new().await;
        let register = RegisterHandler::new(ctx.users.clone(), ctx.hasher.clone());
        let login = LoginHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone());

        let user = register
            .handle(Register {
                email: "new@example.com".into(),
                nickname: "Newbie".into(),
                password: TEST_PASSWORD.into(),
            })
            .await
            .unwrap();
        assert_ne!(user.password_hash, TEST_PASSWORD);

        let response = login
            .handle(Login {
                email: "new@example.com".into(),
                password: TEST_PASSWORD.into(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.id, user.id);
        assert_eq!(
            ctx.tokens.verify_access(&response.tokens.access_token).unwrap(),
            user.id
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let ctx = TestContext::new().await;
        ctx.user("dup@example.com").await;
        let register = RegisterHandler::new(ctx.users.clone(), ctx.hasher.clone());

        let err = register
            .handle(Register {
                email: "dup@example.com".into(),
                nickname: "Dup".into(),
                password: TEST_PASSWORD.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let ctx = TestContext::new().await;
        ctx.user("me@example.com").await;
        let login = LoginHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone());

        let err = login
            .handle(Login {
                email: "me@example.com".into(),
                password: "not-the-password".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let ctx = TestContext::new().await;
        let user = ctx.user("me@example.com").await;
        let pair = ctx.tokens.issue(user.id).unwrap();
        let handler = RefreshTokensHandler::new(ctx.users.clone(), ctx.tokens.clone());

        let err = handler
            .handle(RefreshTokens {
                refresh_token: pair.access_token,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));

        let refreshed = handler
            .handle(RefreshTokens {
                refresh_token: pair.refresh_token,
            })
            .await
            .unwrap();
        assert_eq!(ctx.tokens.verify_access(&refreshed.access_token).unwrap(), user.id);
    }
}
