use async_trait::async_trait;
use sqlx::Row;

use prep_core::model::{QuestionRecord, TopicId};

use super::SqliteRepository;
use super::mapping::{map_question_row, question_id_to_i64, ser, tags_to_json};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait]
impl QuestionRepository for SqliteRepository {
    async fn topic_questions(&self, topic: &TopicId) -> Result<Vec<QuestionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question, answer, category, difficulty, tags
            FROM questions
            WHERE topic = ?1
            ORDER BY position ASC
            ",
        )
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if rows.is_empty() {
            return Err(StorageError::NotFound);
        }

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(map_question_row(&row)?);
        }
        Ok(records)
    }

    async fn replace_questions(
        &self,
        topic: &TopicId,
        records: &[QuestionRecord],
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM questions WHERE topic = ?1")
            .bind(topic.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, record) in records.iter().enumerate() {
            let tags = record
                .tags
                .as_deref()
                .map(tags_to_json)
                .transpose()?;

            sqlx::query(
                r"
                INSERT INTO questions (topic, id, position, question, answer, category, difficulty, tags)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(topic.as_str())
            .bind(question_id_to_i64(record.id)?)
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(&record.question)
            .bind(&record.answer)
            .bind(record.category.as_deref())
            .bind(record.difficulty.map(|d| d.as_str()))
            .bind(tags)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    async fn list_topics(&self) -> Result<Vec<TopicId>, StorageError> {
        let rows = sqlx::query("SELECT DISTINCT topic FROM questions ORDER BY topic ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row.try_get("topic").map_err(ser)?;
            topics.push(TopicId::new(raw).map_err(ser)?);
        }
        Ok(topics)
    }
}
