//! # User Repository
//!
//! Database operations for operator accounts. Password hashing is the
//! session layer's concern; this repository stores whatever hash it is
//! handed.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kade_core::UserAccount;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all users, ordered by username.
    pub async fn list_all(&self) -> DbResult<Vec<UserAccount>> {
        let users = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            ORDER BY username COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Gets a user by login name.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user. Fails with UniqueViolation on a duplicate username.
    pub async fn insert(&self, user: &UserAccount) -> DbResult<()> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a user by ID.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts all users. Zero means first run: the session layer seeds the
    /// default admin account.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
