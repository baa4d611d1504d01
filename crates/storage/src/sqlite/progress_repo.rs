use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::Row;

use prep_core::model::{QuestionId, TopicId, TopicProgress};

use super::SqliteRepository;
use super::mapping::{
    cursor_from_i64, cursor_to_i64, parse_mode, question_id_from_i64, question_id_to_i64, ser,
};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT cursor, mode, updated_at
            FROM progress
            WHERE topic = ?1
            ",
        )
        .bind(topic.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let cursor = cursor_from_i64(row.try_get::<i64, _>("cursor").map_err(ser)?)?;
        let mode_raw: String = row.try_get("mode").map_err(ser)?;
        let mode = parse_mode(&mode_raw)?;
        let updated_at = row.try_get("updated_at").map_err(ser)?;

        let completed = self.id_set(topic, "progress_completed").await?;
        let bookmarked = self.id_set(topic, "progress_bookmarks").await?;

        let note_rows = sqlx::query(
            r"
            SELECT question_id, body
            FROM progress_notes
            WHERE topic = ?1
            ",
        )
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut notes = HashMap::with_capacity(note_rows.len());
        for row in note_rows {
            let id = question_id_from_i64(row.try_get::<i64, _>("question_id").map_err(ser)?)?;
            let body: String = row.try_get("body").map_err(ser)?;
            notes.insert(id, body);
        }

        Ok(Some(TopicProgress::from_persisted(
            completed, bookmarked, notes, cursor, mode, updated_at,
        )))
    }

    async fn save_progress(
        &self,
        topic: &TopicId,
        progress: &TopicProgress,
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO progress (topic, cursor, mode, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(topic) DO UPDATE SET
                cursor = excluded.cursor,
                mode = excluded.mode,
                updated_at = excluded.updated_at
            ",
        )
        .bind(topic.as_str())
        .bind(cursor_to_i64(progress.cursor())?)
        .bind(progress.mode().as_str())
        .bind(progress.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Full-state write: replace the child rows wholesale.
        for table in ["progress_completed", "progress_bookmarks", "progress_notes"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE topic = ?1"))
                .bind(topic.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        for &id in progress.completed() {
            sqlx::query("INSERT INTO progress_completed (topic, question_id) VALUES (?1, ?2)")
                .bind(topic.as_str())
                .bind(question_id_to_i64(id)?)
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        for &id in progress.bookmarked() {
            sqlx::query("INSERT INTO progress_bookmarks (topic, question_id) VALUES (?1, ?2)")
                .bind(topic.as_str())
                .bind(question_id_to_i64(id)?)
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        for (&id, body) in progress.notes() {
            sqlx::query(
                "INSERT INTO progress_notes (topic, question_id, body) VALUES (?1, ?2, ?3)",
            )
            .bind(topic.as_str())
            .bind(question_id_to_i64(id)?)
            .bind(body)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

impl SqliteRepository {
    async fn id_set(
        &self,
        topic: &TopicId,
        table: &'static str,
    ) -> Result<HashSet<QuestionId>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT question_id FROM {table} WHERE topic = ?1"
        ))
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut ids = HashSet::with_capacity(rows.len());
        for row in rows {
            ids.insert(question_id_from_i64(
                row.try_get::<i64, _>("question_id").map_err(ser)?,
            )?);
        }
        Ok(ids)
    }
}
