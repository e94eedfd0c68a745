//! PostgreSQL implementation of LearnedRecordStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, Timestamp, UserId, WordId};
use crate::domain::vocabulary::LearnedRecord;
use crate::ports::LearnedRecordStore;

use super::{db_error, word_id_from_row};

/// PostgreSQL implementation of LearnedRecordStore.
#[derive(Clone)]
pub struct PostgresLearnedRecordStore {
    pool: PgPool,
}

impl PostgresLearnedRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearnedRecordStore for PostgresLearnedRecordStore {
    async fn upsert(&self, record: &LearnedRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO learned_words (user_id, word_id, learned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, word_id) DO UPDATE SET learned_at = EXCLUDED.learned_at
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(record.word_id.value())
        .bind(record.learned_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("upsert learned word"))?;

        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<LearnedRecord>, DomainError> {
        let row = sqlx::query(
            "SELECT learned_at FROM learned_words WHERE user_id = $1 AND word_id = $2",
        )
        .bind(user_id.as_str())
        .bind(word_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch learned word"))?;

        Ok(row.map(|row| {
            let learned_at: chrono::DateTime<chrono::Utc> = row.get("learned_at");
            LearnedRecord::new(user_id.clone(), word_id, Timestamp::from_datetime(learned_at))
        }))
    }

    async fn count(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM learned_words WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count learned words"))?;

        Ok(count.max(0) as u64)
    }

    async fn list(
        &self,
        user_id: &UserId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LearnedRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT word_id, learned_at FROM learned_words
            WHERE user_id = $1
            ORDER BY learned_at DESC, word_id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list learned words"))?;

        rows.into_iter()
            .map(|row| {
                let learned_at: chrono::DateTime<chrono::Utc> = row.get("learned_at");
                Ok(LearnedRecord::new(
                    user_id.clone(),
                    word_id_from_row(&row)?,
                    Timestamp::from_datetime(learned_at),
                ))
            })
            .collect()
    }

    async fn exists(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM learned_words WHERE user_id = $1 AND word_id = $2)",
        )
        .bind(user_id.as_str())
        .bind(word_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("check learned word"))?;

        Ok(exists)
    }
}
