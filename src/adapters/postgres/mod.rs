//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresCycleStore` - Cycles and their vocabulary entries
//! - `PostgresLearnedRecordStore` - Learned words per learner
//! - `PostgresVocabularyCatalog` - Catalog words, with seed import
//!
//! Schema lives in `migrations/`; [`connect`] builds the pool and applies
//! it on request.

mod cycle_store;
mod learned_record_store;
mod vocabulary_catalog;

pub use cycle_store::PostgresCycleStore;
pub use learned_record_store::PostgresLearnedRecordStore;
pub use vocabulary_catalog::PostgresVocabularyCatalog;

use std::str::FromStr;

use secrecy::ExposeSecret;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::cycle::EntryStatus;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, WordId};

/// Opens the connection pool and runs migrations when configured to.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(config.url.expose_secret())
        .await
        .map_err(db_error("connect"))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))?;
        tracing::info!("Database migrations applied");
    }

    Ok(pool)
}

/// Maps a sqlx failure to `DatabaseError`, naming the failed action.
pub(crate) fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("Failed to {}: {}", action, e))
}

pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
{
    value.parse::<T>().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} in database: {}", column, value),
        )
    })
}

pub(crate) fn str_to_entry_status(value: &str) -> Result<EntryStatus, DomainError> {
    parse_column("status", value)
}

pub(crate) fn user_id_from_row(row: &PgRow) -> Result<UserId, DomainError> {
    let raw: String = row.get("user_id");
    UserId::new(raw).map_err(DomainError::from)
}

pub(crate) fn word_id_from_row(row: &PgRow) -> Result<WordId, DomainError> {
    let raw: i64 = row.get("word_id");
    WordId::new(raw).map_err(DomainError::from)
}
