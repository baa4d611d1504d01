use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: question sets keyed by topic, one progress row
/// per topic, and child tables for completed ids, bookmarks, and notes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    topic TEXT NOT NULL,
                    id INTEGER NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    category TEXT,
                    difficulty TEXT,
                    tags TEXT,
                    PRIMARY KEY (topic, id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS progress (
                    topic TEXT PRIMARY KEY,
                    cursor INTEGER NOT NULL CHECK (cursor >= 0),
                    mode TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS progress_completed (
                    topic TEXT NOT NULL,
                    question_id INTEGER NOT NULL,
                    PRIMARY KEY (topic, question_id),
                    FOREIGN KEY (topic) REFERENCES progress(topic) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS progress_bookmarks (
                    topic TEXT NOT NULL,
                    question_id INTEGER NOT NULL,
                    PRIMARY KEY (topic, question_id),
                    FOREIGN KEY (topic) REFERENCES progress(topic) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS progress_notes (
                    topic TEXT NOT NULL,
                    question_id INTEGER NOT NULL,
                    body TEXT NOT NULL,
                    PRIMARY KEY (topic, question_id),
                    FOREIGN KEY (topic) REFERENCES progress(topic) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_topic_position
                    ON questions (topic, position);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
