use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use prep_core::model::{Difficulty, QuestionId, QuestionRecord, TraversalMode};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("question_id overflow".into()))
}

pub(crate) fn cursor_from_i64(v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid cursor: {v}")))
}

pub(crate) fn cursor_to_i64(cursor: usize) -> Result<i64, StorageError> {
    i64::try_from(cursor).map_err(|_| StorageError::Serialization("cursor overflow".into()))
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

pub(crate) fn parse_mode(s: &str) -> Result<TraversalMode, StorageError> {
    s.parse::<TraversalMode>().map_err(ser)
}

/// Tags are stored as a JSON array; free-text tags make any joined-string
/// encoding lossy.
pub(crate) fn tags_to_json(tags: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(tags).map_err(ser)
}

pub(crate) fn tags_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<QuestionRecord, StorageError> {
    let difficulty = row
        .try_get::<Option<String>, _>("difficulty")
        .map_err(ser)?
        .map(|s| parse_difficulty(&s))
        .transpose()?;

    let tags = row
        .try_get::<Option<String>, _>("tags")
        .map_err(ser)?
        .map(|s| tags_from_json(&s))
        .transpose()?;

    Ok(QuestionRecord {
        id: question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        question: row.try_get("question").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
        category: row.try_get("category").map_err(ser)?,
        difficulty,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip_through_json() {
        let tags = vec!["state".to_string(), "free text tag".to_string()];
        let encoded = tags_to_json(&tags).unwrap();
        assert_eq!(tags_from_json(&encoded).unwrap(), tags);
    }

    #[test]
    fn difficulty_and_mode_parse_their_storage_labels() {
        assert_eq!(parse_difficulty("expert").unwrap(), Difficulty::Expert);
        assert_eq!(parse_mode("bookmarked").unwrap(), TraversalMode::Bookmarked);
        assert!(parse_difficulty("impossible").is_err());
        assert!(parse_mode("spiral").is_err());
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(question_id_from_i64(-1).is_err());
        assert!(cursor_from_i64(-5).is_err());
    }
}
