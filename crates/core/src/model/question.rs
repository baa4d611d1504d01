use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty band assigned to a question, either authored or derived from
/// the question text during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid difficulty: {raw}")]
pub struct ParseDifficultyError {
    raw: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(ParseDifficultyError {
                raw: other.to_string(),
            }),
        }
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Raw question record as supplied by a question source.
///
/// Classification metadata is optional here; the enricher resolves the raw
/// record into an [`EnrichedQuestion`] once per topic load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl QuestionRecord {
    /// Convenience constructor for a record with no authored metadata.
    #[must_use]
    pub fn bare(id: QuestionId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            category: None,
            difficulty: None,
            tags: None,
        }
    }
}

/// Question record with classification metadata guaranteed present.
///
/// Produced by the enricher; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedQuestion {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

impl From<EnrichedQuestion> for QuestionRecord {
    fn from(q: EnrichedQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            answer: q.answer,
            category: Some(q.category),
            difficulty: Some(q.difficulty),
            tags: Some(q.tags),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
