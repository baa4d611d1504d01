//! Filter engine: narrows an enriched question list by the active criteria
//! and traversal mode. Pure; an empty result is a valid terminal state.

use std::collections::HashSet;

use crate::model::{Difficulty, EnrichedQuestion, QuestionId, TraversalMode};

/// Transient, UI-driven filter state.
///
/// An empty `search` string and `None` for the exact-match fields mean "no
/// constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl FilterCriteria {
    /// Criteria that let every question through.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.category.is_none() && self.difficulty.is_none()
    }
}

/// Apply the active predicates in fixed order: bookmarked-mode membership,
/// then search, then category, then difficulty. Conjunctive: a question must
/// survive every active predicate.
#[must_use]
pub fn apply<'a>(
    questions: &'a [EnrichedQuestion],
    criteria: &FilterCriteria,
    mode: TraversalMode,
    bookmarked: &HashSet<QuestionId>,
) -> Vec<&'a EnrichedQuestion> {
    let needle = criteria.search.to_lowercase();

    questions
        .iter()
        .filter(|q| mode != TraversalMode::Bookmarked || bookmarked.contains(&q.id))
        .filter(|q| needle.is_empty() || matches_search(q, &needle))
        .filter(|q| {
            criteria
                .category
                .as_ref()
                .is_none_or(|category| q.category == *category)
        })
        .filter(|q| {
            criteria
                .difficulty
                .is_none_or(|difficulty| q.difficulty == difficulty)
        })
        .collect()
}

/// Lowercased substring match across question text, answer text, category,
/// and every tag.
fn matches_search(question: &EnrichedQuestion, needle: &str) -> bool {
    question.question.to_lowercase().contains(needle)
        || question.answer.to_lowercase().contains(needle)
        || question.category.to_lowercase().contains(needle)
        || question
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_question;
    use crate::model::QuestionRecord;

    fn question(id: u64, text: &str, answer: &str) -> EnrichedQuestion {
        enrich_question(QuestionRecord::bare(QuestionId::new(id), text, answer))
    }

    fn fixture() -> Vec<EnrichedQuestion> {
        vec![
            question(1, "How do reactive forms validate input?", "Validators."),
            question(2, "What is an RxJS observable?", "A push stream."),
            question(3, "How do router guards work?", "They gate navigation."),
            question(4, "What is a closure?", "A captured scope."),
        ]
    }

    #[test]
    fn unconstrained_criteria_pass_everything_through() {
        let questions = fixture();
        let result = apply(
            &questions,
            &FilterCriteria::none(),
            TraversalMode::Sequential,
            &HashSet::new(),
        );
        assert_eq!(result.len(), questions.len());
    }

    #[test]
    fn search_matches_across_fields() {
        let questions = fixture();
        let criteria = FilterCriteria {
            search: "ROUTING".to_string(),
            ..FilterCriteria::default()
        };

        // "routing" only appears in the derived category/tags, not the text.
        let result = apply(
            &questions,
            &criteria,
            TraversalMode::Sequential,
            &HashSet::new(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, QuestionId::new(3));
    }

    #[test]
    fn category_filter_is_exact() {
        let questions = fixture();
        let criteria = FilterCriteria {
            category: Some("Forms".to_string()),
            ..FilterCriteria::default()
        };

        let result = apply(
            &questions,
            &criteria,
            TraversalMode::Sequential,
            &HashSet::new(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "Forms");
    }

    #[test]
    fn bookmarked_mode_keeps_only_bookmarked_ids() {
        let questions = fixture();
        let bookmarked: HashSet<_> = [QuestionId::new(2), QuestionId::new(4)].into();

        let result = apply(
            &questions,
            &FilterCriteria::none(),
            TraversalMode::Bookmarked,
            &bookmarked,
        );
        let ids: Vec<_> = result.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuestionId::new(2), QuestionId::new(4)]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let questions = fixture();
        let bookmarked: HashSet<_> = [QuestionId::new(1), QuestionId::new(2)].into();
        let criteria = FilterCriteria {
            search: "observable".to_string(),
            ..FilterCriteria::default()
        };

        let result = apply(&questions, &criteria, TraversalMode::Bookmarked, &bookmarked);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, QuestionId::new(2));
    }

    #[test]
    fn result_elements_satisfy_every_active_predicate() {
        let questions = fixture();
        let criteria = FilterCriteria {
            search: "a".to_string(),
            category: Some("Observables".to_string()),
            difficulty: Some(crate::model::Difficulty::Intermediate),
        };

        let result = apply(
            &questions,
            &criteria,
            TraversalMode::Sequential,
            &HashSet::new(),
        );
        assert!(result.len() <= questions.len());
        for q in result {
            assert!(matches_search(q, "a"));
            assert_eq!(q.category, "Observables");
            assert_eq!(q.difficulty, crate::model::Difficulty::Intermediate);
        }
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let questions = fixture();
        let criteria = FilterCriteria {
            search: "kubernetes".to_string(),
            ..FilterCriteria::default()
        };

        let result = apply(
            &questions,
            &criteria,
            TraversalMode::Sequential,
            &HashSet::new(),
        );
        assert!(result.is_empty());
    }
}
