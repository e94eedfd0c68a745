//! PostgreSQL implementation of CycleStore.
//!
//! One row per learner in `learning_cycles`; entries live in
//! `cycle_vocabulary_entries` keyed by (user, word) so they outlive a
//! renewed cycle identity.
//!
//! Multi-row writes run in one transaction that first locks the learner's
//! `learning_cycles` row (`FOR UPDATE`), so concurrent instances serialize
//! per learner.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::cycle::{CycleVocabularyEntry, LearningCycle};
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, Timestamp, UserId, WordId};
use crate::ports::{CycleStore, EntryChange, EntryCounts, LearnedChange};

use super::{db_error, str_to_entry_status, user_id_from_row, word_id_from_row};

/// PostgreSQL implementation of CycleStore.
#[derive(Clone)]
pub struct PostgresCycleStore {
    pool: PgPool,
}

impl PostgresCycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_learner(tx: &mut Transaction<'_, Postgres>, user_id: &UserId) -> Result<(), DomainError> {
    sqlx::query("SELECT 1 FROM learning_cycles WHERE user_id = $1 FOR UPDATE")
        .bind(user_id.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error("lock cycle"))?;
    Ok(())
}

fn entry_not_found(word_id: WordId) -> DomainError {
    DomainError::new(
        ErrorCode::EntryNotFound,
        format!("Word {} is not in the cycle", word_id),
    )
}

#[async_trait]
impl CycleStore for PostgresCycleStore {
    async fn find_cycle(&self, user_id: &UserId) -> Result<Option<LearningCycle>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, started_at, ends_at
            FROM learning_cycles WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch cycle"))?;

        row.map(row_to_cycle).transpose()
    }

    async fn save_cycle(&self, cycle: &LearningCycle) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO learning_cycles (user_id, id, started_at, ends_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                id = EXCLUDED.id,
                started_at = EXCLUDED.started_at,
                ends_at = EXCLUDED.ends_at
            "#,
        )
        .bind(cycle.user_id().as_str())
        .bind(cycle.id().as_uuid())
        .bind(cycle.started_at().as_datetime())
        .bind(cycle.ends_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("save cycle"))?;

        Ok(())
    }

    async fn renew_cycle(
        &self,
        previous: &CycleId,
        next: &LearningCycle,
        discard_entries: bool,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;
        lock_learner(&mut tx, next.user_id()).await?;

        let retired = sqlx::query("DELETE FROM learning_cycles WHERE user_id = $1 AND id = $2")
            .bind(next.user_id().as_str())
            .bind(previous.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("retire cycle"))?;

        if retired.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CycleNotFound,
                format!("Cycle {} is no longer current", previous),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO learning_cycles (user_id, id, started_at, ends_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(next.user_id().as_str())
        .bind(next.id().as_uuid())
        .bind(next.started_at().as_datetime())
        .bind(next.ends_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert renewed cycle"))?;

        if discard_entries {
            sqlx::query("DELETE FROM cycle_vocabulary_entries WHERE user_id = $1")
                .bind(next.user_id().as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_error("discard entries"))?;
        }

        tx.commit().await.map_err(db_error("commit renewal"))?;
        Ok(())
    }

    async fn find_entry(
        &self,
        user_id: &UserId,
        word_id: WordId,
    ) -> Result<Option<CycleVocabularyEntry>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, word_id, status, added_at, updated_at
            FROM cycle_vocabulary_entries
            WHERE user_id = $1 AND word_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(word_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch entry"))?;

        row.map(row_to_entry).transpose()
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CycleVocabularyEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, word_id, status, added_at, updated_at
            FROM cycle_vocabulary_entries
            WHERE user_id = $1
            ORDER BY word_id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list entries"))?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn insert_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO cycle_vocabulary_entries (user_id, word_id, status, added_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, word_id) DO NOTHING
            "#,
        )
        .bind(entry.user_id().as_str())
        .bind(entry.word_id().value())
        .bind(entry.status().as_str())
        .bind(entry.added_at().as_datetime())
        .bind(entry.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert entry"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WordAlreadyInCycle,
                format!("Word {} is already in the cycle", entry.word_id()),
            ));
        }
        Ok(())
    }

    async fn update_entry(&self, entry: &CycleVocabularyEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE cycle_vocabulary_entries SET
                status = $3,
                updated_at = $4
            WHERE user_id = $1 AND word_id = $2
            "#,
        )
        .bind(entry.user_id().as_str())
        .bind(entry.word_id().value())
        .bind(entry.status().as_str())
        .bind(entry.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update entry"))?;

        if result.rows_affected() == 0 {
            return Err(entry_not_found(entry.word_id()));
        }
        Ok(())
    }

    async fn delete_entry(&self, user_id: &UserId, word_id: WordId) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM cycle_vocabulary_entries WHERE user_id = $1 AND word_id = $2")
                .bind(user_id.as_str())
                .bind(word_id.value())
                .execute(&self.pool)
                .await
                .map_err(db_error("delete entry"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_learned(
        &self,
        user_id: &UserId,
        changes: &[LearnedChange],
    ) -> Result<(), DomainError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;
        lock_learner(&mut tx, user_id).await?;

        for change in changes {
            let record = &change.record;
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
            .execute(&mut *tx)
            .await
            .map_err(db_error("upsert learned word"))?;

            let affected = match &change.entry {
                EntryChange::Update(entry) => sqlx::query(
                    r#"
                    UPDATE cycle_vocabulary_entries SET
                        status = $3,
                        updated_at = $4
                    WHERE user_id = $1 AND word_id = $2
                    "#,
                )
                .bind(user_id.as_str())
                .bind(entry.word_id().value())
                .bind(entry.status().as_str())
                .bind(entry.updated_at().as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(db_error("update entry"))?
                .rows_affected(),
                EntryChange::Delete => sqlx::query(
                    "DELETE FROM cycle_vocabulary_entries WHERE user_id = $1 AND word_id = $2",
                )
                .bind(user_id.as_str())
                .bind(record.word_id.value())
                .execute(&mut *tx)
                .await
                .map_err(db_error("delete entry"))?
                .rows_affected(),
                EntryChange::Keep => 1,
            };

            // Dropping `tx` without commit rolls the batch back.
            if affected == 0 {
                return Err(entry_not_found(record.word_id));
            }
        }

        tx.commit().await.map_err(db_error("commit learned words"))?;
        Ok(())
    }

    async fn count_entries(&self, user_id: &UserId) -> Result<EntryCounts, DomainError> {
        let (pending, learned): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'learned')
            FROM cycle_vocabulary_entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count entries"))?;

        Ok(EntryCounts {
            pending: pending.max(0) as u64,
            learned: learned.max(0) as u64,
        })
    }
}

fn row_to_cycle(row: sqlx::postgres::PgRow) -> Result<LearningCycle, DomainError> {
    let id: Uuid = row.get("id");
    let started_at: chrono::DateTime<chrono::Utc> = row.get("started_at");
    let ends_at: chrono::DateTime<chrono::Utc> = row.get("ends_at");

    Ok(LearningCycle::reconstitute(
        CycleId::from_uuid(id),
        user_id_from_row(&row)?,
        Timestamp::from_datetime(started_at),
        Timestamp::from_datetime(ends_at),
    ))
}

fn row_to_entry(row: sqlx::postgres::PgRow) -> Result<CycleVocabularyEntry, DomainError> {
    let status: String = row.get("status");
    let added_at: chrono::DateTime<chrono::Utc> = row.get("added_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(CycleVocabularyEntry::reconstitute(
        user_id_from_row(&row)?,
        word_id_from_row(&row)?,
        str_to_entry_status(&status)?,
        Timestamp::from_datetime(added_at),
        Timestamp::from_datetime(updated_at),
    ))
}
