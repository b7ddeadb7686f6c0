//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shown migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHOWN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/connector/migrations/`

use secrecy::SecretString;
use shown_connector::options::{OptionsError, PgOptionStore, create_pool};
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Run the connector migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOWN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("SHOWN_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running connector migrations...");
    PgOptionStore::new(pool).migrate().await?;

    tracing::info!("Connector migrations complete!");
    Ok(())
}
