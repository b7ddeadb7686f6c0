//! `PostgreSQL` option store.
//!
//! # Table: `shown.options`
//!
//! One row per [`OptionKey`], value stored as `JSONB`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/connector/migrations/` and run via:
//! ```bash
//! shown migrate
//! ```

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shown_connector_core::OptionKey;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{OptionStore, OptionsError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Options persisted in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgOptionStore {
    pool: PgPool,
}

impl PgOptionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<(), OptionsError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl OptionStore for PgOptionStore {
    async fn get(&self, key: OptionKey) -> Result<Option<Value>, OptionsError> {
        let value = sqlx::query_scalar::<_, Value>(
            r"
            SELECT value FROM shown.options
            WHERE key = $1
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: OptionKey, value: Value) -> Result<(), OptionsError> {
        sqlx::query(
            r"
            INSERT INTO shown.options (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: OptionKey) -> Result<(), OptionsError> {
        sqlx::query(
            r"
            DELETE FROM shown.options
            WHERE key = $1
            ",
        )
        .bind(key.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
