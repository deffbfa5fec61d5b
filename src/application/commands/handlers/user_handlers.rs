//! User Command Handlers

use std::sync::Arc;

use crate::application::commands::{ChangePassword, UpdateMe};
use crate::application::error::ApplicationError;
use crate::application::ports::{PasswordHasherPort, UserChanges, UserRecord, UserRepositoryPort};

/// 在阻塞线程池中计算密码哈希
pub(crate) async fn hash_password(
    hasher: &Arc<dyn PasswordHasherPort>,
    password: String,
) -> Result<String, ApplicationError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApplicationError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(ApplicationError::from)
}

/// 在阻塞线程池中校验密码
pub(crate) async fn verify_password(
    hasher: &Arc<dyn PasswordHasherPort>,
    password: String,
    hash: String,
) -> Result<bool, ApplicationError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApplicationError::internal(format!("Password check task failed: {}", e)))?
        .map_err(ApplicationError::from)
}

pub struct UpdateMeHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl UpdateMeHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, command: UpdateMe) -> Result<UserRecord, ApplicationError> {
        if let Some(email) = command.email.as_deref() {
            if let Some(holder) = self.user_repo.find_by_email(email).await? {
                if holder.id != command.user_id {
                    return Err(ApplicationError::bad_request("Email already in use"));
                }
            }
        }

        let changes = UserChanges {
            email: command.email,
            nickname: command.nickname,
            image: command.image,
        };
        let user = self.user_repo.update(command.user_id, &changes).await?;

        tracing::info!(user_id = user.id, "Profile updated");

        Ok(user)
    }
}

pub struct ChangePasswordHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl ChangePasswordHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
        }
    }

    pub async fn handle(&self, command: ChangePassword) -> Result<(), ApplicationError> {
        let user = self
            .user_repo
            .find_by_id(command.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("user", command.user_id))?;

        let valid = verify_password(&self.password_hasher, command.password, user.password_hash)
            .await?;
        if !valid {
            return Err(ApplicationError::unauthorized("Invalid credentials"));
        }

        let new_hash = hash_password(&self.password_hasher, command.new_password).await?;
        self.user_repo.update_password(user.id, &new_hash).await?;

        tracing::info!(user_id = user.id, "Password changed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestContext, TEST_PASSWORD};

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let ctx = TestContext::new().await;
        let user = ctx.user("me@example.com").await;
        let handler = ChangePasswordHandler::new(ctx.users.clone(), ctx.hasher.clone());

        let err = handler
            .handle(ChangePassword {
                user_id: user.id,
                password: "wrong-password".into(),
                new_password: "another-password".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(ref m) if m == "Invalid credentials"));

        handler
            .handle(ChangePassword {
                user_id: user.id,
                password: TEST_PASSWORD.into(),
                new_password: "another-password".into(),
            })
            .await
            .unwrap();

        let stored = ctx.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(ctx.hasher.verify("another-password", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_me_rejects_taken_email() {
        let ctx = TestContext::new().await;
        let me = ctx.user("me@example.com").await;
        ctx.user("taken@example.com").await;
        let handler = UpdateMeHandler::new(ctx.users.clone());

        let err = handler
            .handle(UpdateMe {
                user_id: me.id,
                email: Some("taken@example.com".into()),
                nickname: None,
                image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));

        let updated = handler
            .handle(UpdateMe {
                user_id: me.id,
                email: Some("me@example.com".into()),
                nickname: Some("Renamed".into()),
                image: Some(Some("/public/me.png".into())),
            })
            .await
            .unwrap();
        assert_eq!(updated.nickname, "Renamed");
        assert_eq!(updated.image.as_deref(), Some("/public/me.png"));
    }
}
