//! Users repository (patron store)

use sqlx::SqliteConnection;

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct UsersRepository;

impl UsersRepository {
    /// Get user by ID
    pub async fn get_by_id(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Check if email is taken, optionally ignoring one user
    pub async fn email_exists(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)")
                .bind(email)
                .bind(id)
                .fetch_one(conn)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
                .bind(email)
                .fetch_one(conn)
                .await?
        };
        Ok(exists)
    }

    pub async fn list(&self, conn: &mut SqliteConnection) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(conn)
            .await?;
        Ok(users)
    }

    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
        email: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES (?, ?) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .fetch_one(conn)
        .await?;
        Ok(user)
    }

    /// Update name and/or email; `None` keeps the stored value
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    /// Claim the user row for the current transaction (see `BooksRepository::claim`)
    pub async fn claim(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET name = name WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
