//! SQLite User Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{db_error, format_timestamp, parse_timestamp, DbPool};
use crate::application::ports::{
    NewUser, RepositoryError, UserChanges, UserRecord, UserRepositoryPort,
};

const USER_COLUMNS: &str = "id, email, nickname, password_hash, image, created_at, updated_at";

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    nickname: String,
    password_hash: String,
    image: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: row.id,
            email: row.email,
            nickname: row.nickname,
            password_hash: row.password_hash,
            image: row.image,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserRecord, RepositoryError> {
        let now = format_timestamp(Utc::now());
        let id = sqlx::query(
            r#"
            INSERT INTO users (email, nickname, password_hash, image, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE(?, email),
                nickname = COALESCE(?, nickname),
                image = CASE WHEN ? THEN ? ELSE image END,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.email)
        .bind(&changes.nickname)
        .bind(changes.image.is_some())
        .bind(changes.image.as_ref().and_then(|image| image.as_deref()))
        .bind(format_timestamp(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(format_timestamp(Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteUserRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            nickname: "nick".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let created = repo.create(&new_user("a@example.com")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.image, None);

        let by_email = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert!(repo.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_reported() {
        let repo = repo().await;
        repo.create(&new_user("a@example.com")).await.unwrap();
        let err = repo.create(&new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let repo = repo().await;
        let user = repo.create(&new_user("a@example.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                &UserChanges {
                    image: Some(Some("/public/me.png".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "a@example.com");
        assert_eq!(updated.nickname, "nick");
        assert_eq!(updated.image.as_deref(), Some("/public/me.png"));
        assert!(updated.updated_at >= user.updated_at);

        let cleared = repo
            .update(
                user.id,
                &UserChanges {
                    image: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.image, None);
        assert_eq!(cleared.nickname, "nick");
    }

    #[tokio::test]
    async fn test_update_password_of_missing_user() {
        let repo = repo().await;
        let err = repo.update_password(99, "x").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
