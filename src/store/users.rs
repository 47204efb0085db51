use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::user::User;
use crate::session;

use super::{Store, StoreError};

const COLUMNS: &str = "id, username, email, is_staff, password_hash";

fn row_to_user(row: &SqliteRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        is_staff: row.try_get("is_staff")?,
        password_hash: row.try_get("password_hash")?,
    })
}

impl Store {
    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    /// Create or refresh an account; used for startup seeding.
    pub async fn ensure_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_staff: bool,
    ) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, is_staff, password_hash) VALUES (?, ?, ?, ?) \
             ON CONFLICT(username) DO UPDATE SET email = excluded.email, \
             is_staff = excluded.is_staff, password_hash = excluded.password_hash \
             RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(username)
            .bind(email)
            .bind(is_staff)
            .bind(session::hash_password(password))
            .fetch_one(self.pool())
            .await?;
        row_to_user(&row)
    }
}
