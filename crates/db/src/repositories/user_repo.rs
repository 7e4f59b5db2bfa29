//! Repository for the `users` table.

use fieldcrm_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, role, duty_status, utc_offset_minutes, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role, utc_offset_minutes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(input.utc_offset_minutes)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read the cached duty flag and hold the user row lock until the
    /// surrounding transaction ends.
    pub async fn lock_duty_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT duty_status FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// Overwrite the cached duty flag. Returns `true` if the user exists.
    pub async fn set_duty_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        on_duty: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET duty_status = $2 WHERE id = $1")
            .bind(id)
            .bind(on_duty)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
