//! PostgreSQL implementation of VocabularyCatalog.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, WordId};
use crate::domain::vocabulary::{PartOfSpeech, VocabLevel, WordMetadata};
use crate::ports::{CatalogDistribution, VocabularyCatalog};

use super::{db_error, parse_column, word_id_from_row};

const WORD_COLUMNS: &str =
    "word_id, word, definition, example, level, topic, pronunciation, part_of_speech";

/// PostgreSQL implementation of VocabularyCatalog.
#[derive(Clone)]
pub struct PostgresVocabularyCatalog {
    pool: PgPool,
}

impl PostgresVocabularyCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or refreshes catalog words, e.g. from a seed file.
    ///
    /// Returns the number of words written.
    pub async fn import(&self, words: &[WordMetadata]) -> Result<u64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        for word in words {
            sqlx::query(
                r#"
                INSERT INTO vocabulary_words
                    (word_id, word, definition, example, level, topic, pronunciation, part_of_speech)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (word_id) DO UPDATE SET
                    word = EXCLUDED.word,
                    definition = EXCLUDED.definition,
                    example = EXCLUDED.example,
                    level = EXCLUDED.level,
                    topic = EXCLUDED.topic,
                    pronunciation = EXCLUDED.pronunciation,
                    part_of_speech = EXCLUDED.part_of_speech
                "#,
            )
            .bind(word.word_id.value())
            .bind(&word.word)
            .bind(&word.definition)
            .bind(&word.example)
            .bind(word.level.as_str())
            .bind(&word.topic)
            .bind(&word.pronunciation)
            .bind(word.part_of_speech.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error("import word"))?;
        }

        tx.commit().await.map_err(db_error("commit import"))?;
        Ok(words.len() as u64)
    }
}

#[async_trait]
impl VocabularyCatalog for PostgresVocabularyCatalog {
    async fn lookup(&self, word_id: WordId) -> Result<Option<WordMetadata>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM vocabulary_words WHERE word_id = $1",
            WORD_COLUMNS
        ))
        .bind(word_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch word"))?;

        row.map(row_to_word).transpose()
    }

    async fn lookup_many(&self, word_ids: &[WordId]) -> Result<Vec<WordMetadata>, DomainError> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = word_ids.iter().map(WordId::value).collect();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM vocabulary_words WHERE word_id = ANY($1) ORDER BY word_id",
            WORD_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch words"))?;

        rows.into_iter().map(row_to_word).collect()
    }

    async fn all_definitions(&self) -> Result<Vec<String>, DomainError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT definition FROM vocabulary_words")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("fetch definitions"))?;

        Ok(rows.into_iter().map(|(d,)| d).collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vocabulary_words")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count words"))?;

        Ok(count.max(0) as u64)
    }

    async fn distribution(&self) -> Result<CatalogDistribution, DomainError> {
        let levels: Vec<(String, i64)> =
            sqlx::query_as("SELECT level, COUNT(*) FROM vocabulary_words GROUP BY level")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("count words by level"))?;

        let topics: Vec<(String, i64)> = sqlx::query_as(
            "SELECT topic, COUNT(*) FROM vocabulary_words WHERE btrim(topic) <> '' GROUP BY topic",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("count words by topic"))?;

        Ok(CatalogDistribution {
            by_level: levels.into_iter().map(|(k, n)| (k, n.max(0) as u64)).collect(),
            by_topic: topics.into_iter().map(|(k, n)| (k, n.max(0) as u64)).collect(),
        })
    }
}

fn row_to_word(row: sqlx::postgres::PgRow) -> Result<WordMetadata, DomainError> {
    let level: String = row.get("level");
    let part_of_speech: String = row.get("part_of_speech");

    Ok(WordMetadata {
        word_id: word_id_from_row(&row)?,
        word: row.get("word"),
        definition: row.get("definition"),
        example: row.get("example"),
        level: parse_column::<VocabLevel>("level", &level)?,
        topic: row.get("topic"),
        pronunciation: row.get("pronunciation"),
        part_of_speech: parse_column::<PartOfSpeech>("part_of_speech", &part_of_speech)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_level_and_part_of_speech_parse() {
        assert_eq!(parse_column::<VocabLevel>("level", "b2").unwrap(), VocabLevel::B2);
        assert_eq!(
            parse_column::<PartOfSpeech>("part_of_speech", "verb").unwrap(),
            PartOfSpeech::Verb
        );
        assert!(parse_column::<VocabLevel>("level", "d1").is_err());
    }
}
