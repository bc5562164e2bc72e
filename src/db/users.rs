use time::OffsetDateTime;

use super::{is_unique_violation, DbError, DbResult, Repository, User};

const TAKEN: &str = "Username has already been taken";

impl Repository {
    pub async fn create_user(&self, username: &str) -> DbResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DbError::Invalid(vec!["Username can't be blank".to_owned()]));
        }
        if self.find_user_by_username(username).await?.is_some() {
            return Err(DbError::Invalid(vec![TAKEN.to_owned()]));
        }

        let now = OffsetDateTime::now_utc();
        sqlx::query_as(
            "INSERT INTO users (username,created_at,updated_at) VALUES (?,?,?) \
             RETURNING id,username,created_at,updated_at",
        )
        .bind(username)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                DbError::Invalid(vec![TAKEN.to_owned()])
            } else {
                err.into()
            }
        })
    }

    pub async fn find_user(&self, id: i64) -> DbResult<User> {
        sqlx::query_as("SELECT id,username,created_at,updated_at FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound("User"))
    }

    pub async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        Ok(
            sqlx::query_as("SELECT id,username,created_at,updated_at FROM users WHERE username=?")
                .bind(username.trim())
                .fetch_optional(&self.pool)
                .await?
        )
    }

    /// Everyone but `user_id`, alphabetically.
    pub async fn users_except(&self, user_id: i64) -> DbResult<Vec<User>> {
        Ok(
            sqlx::query_as(
                "SELECT id,username,created_at,updated_at FROM users WHERE id<>? ORDER BY username",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
        )
    }
}
