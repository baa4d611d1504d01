//! Metadata enrichment: fills in missing `category`, `difficulty`, and
//! `tags` on raw question records using keyword heuristics over the question
//! and answer text.
//!
//! Pure and deterministic; enriching an already-enriched record is a no-op.

use crate::model::{Difficulty, EnrichedQuestion, QuestionRecord};

//
// ─── RULE TABLE ────────────────────────────────────────────────────────────────
//

struct CategoryRule {
    keywords: &'static [&'static str],
    category: &'static str,
    tags: &'static [&'static str],
}

/// Ordered classification rules. The first rule with any keyword present in
/// the lowercased question+answer text wins; ordering is the tie-break
/// policy, so a question mentioning both observables and testing is
/// classified by whichever rule comes first here.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["rxjs", "observable", "subject", "subscription"],
        category: "Observables",
        tags: &["rxjs", "async"],
    },
    CategoryRule {
        keywords: &["form", "validation", "validator"],
        category: "Forms",
        tags: &["forms", "validation"],
    },
    CategoryRule {
        keywords: &["route", "router", "navigation", "guard"],
        category: "Routing",
        tags: &["routing", "navigation"],
    },
    CategoryRule {
        keywords: &["http", "request", "interceptor", "rest api"],
        category: "HTTP",
        tags: &["http", "api"],
    },
    CategoryRule {
        keywords: &["state management", "store", "redux", "ngrx"],
        category: "State Management",
        tags: &["state", "store"],
    },
    CategoryRule {
        keywords: &["test", "jasmine", "karma", "jest", "mock"],
        category: "Testing",
        tags: &["testing"],
    },
    CategoryRule {
        keywords: &["performance", "lazy load", "change detection", "memoiz"],
        category: "Performance",
        tags: &["performance"],
    },
    CategoryRule {
        keywords: &["security", "auth", "token", "xss"],
        category: "Security",
        tags: &["security"],
    },
    CategoryRule {
        keywords: &["component", "lifecycle", "template", "directive"],
        category: "Components",
        tags: &["components"],
    },
    CategoryRule {
        keywords: &["dependency injection", "injector", "provider", "service"],
        category: "Dependency Injection",
        tags: &["di", "services"],
    },
];

/// Category and tags when no rule matches.
const FALLBACK_CATEGORY: &str = "General";

/// Markers that upgrade difficulty from intermediate to advanced.
const ADVANCED_MARKERS: &[&str] = &[
    "advanced",
    "complex",
    "architecture",
    "optimization",
    "internals",
];

/// Markers that upgrade difficulty to expert. Checked after the advanced
/// markers and overriding them unconditionally.
const EXPERT_MARKERS: &[&str] = &["expert", "senior", "scaling", "enterprise"];

//
// ─── ENRICHMENT ────────────────────────────────────────────────────────────────
//

/// Enrich a whole question set. Order is preserved.
#[must_use]
pub fn enrich(records: Vec<QuestionRecord>) -> Vec<EnrichedQuestion> {
    records.into_iter().map(enrich_question).collect()
}

/// Resolve a raw record into a fully-populated question.
///
/// Fields that are already authored pass through untouched; only missing
/// ones are derived from the text.
#[must_use]
pub fn enrich_question(record: QuestionRecord) -> EnrichedQuestion {
    let QuestionRecord {
        id,
        question,
        answer,
        category,
        difficulty,
        tags,
    } = record;

    let needs_classification =
        category.is_none() || difficulty.is_none() || tags.is_none();
    let haystack = if needs_classification {
        let mut text = question.to_lowercase();
        text.push(' ');
        text.push_str(&answer.to_lowercase());
        text
    } else {
        String::new()
    };

    let (rule_category, rule_tags) = if category.is_none() || tags.is_none() {
        classify(&haystack)
    } else {
        (FALLBACK_CATEGORY, &[][..])
    };

    EnrichedQuestion {
        id,
        question,
        answer,
        category: category.unwrap_or_else(|| rule_category.to_string()),
        difficulty: difficulty.unwrap_or_else(|| assess_difficulty(&haystack)),
        tags: tags.unwrap_or_else(|| rule_tags.iter().map(ToString::to_string).collect()),
    }
}

fn classify(haystack: &str) -> (&'static str, &'static [&'static str]) {
    for rule in CATEGORY_RULES {
        if rule.keywords.iter().any(|kw| haystack.contains(kw)) {
            return (rule.category, rule.tags);
        }
    }
    (FALLBACK_CATEGORY, &[])
}

fn assess_difficulty(haystack: &str) -> Difficulty {
    let mut difficulty = Difficulty::Intermediate;
    if ADVANCED_MARKERS.iter().any(|m| haystack.contains(m)) {
        difficulty = Difficulty::Advanced;
    }
    if EXPERT_MARKERS.iter().any(|m| haystack.contains(m)) {
        difficulty = Difficulty::Expert;
    }
    difficulty
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn bare(id: u64, question: &str, answer: &str) -> QuestionRecord {
        QuestionRecord::bare(QuestionId::new(id), question, answer)
    }

    #[test]
    fn unmatched_text_falls_back_to_general() {
        let enriched = enrich_question(bare(1, "What is a closure?", "A captured scope."));
        assert_eq!(enriched.category, "General");
        assert!(enriched.tags.is_empty());
        assert_eq!(enriched.difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn first_matching_rule_wins() {
        // Mentions both observables and testing; the observables rule is
        // listed first and must take the tie.
        let enriched = enrich_question(bare(
            2,
            "How do you test an RxJS observable?",
            "Use marble testing.",
        ));
        assert_eq!(enriched.category, "Observables");
    }

    #[test]
    fn expert_markers_override_advanced_markers() {
        let enriched = enrich_question(bare(
            3,
            "Describe an advanced architecture for scaling rendering.",
            "Split work across workers.",
        ));
        assert_eq!(enriched.difficulty, Difficulty::Expert);
    }

    #[test]
    fn advanced_markers_upgrade_from_intermediate() {
        let enriched = enrich_question(bare(
            4,
            "Explain a complex template scenario.",
            "Nested structural directives.",
        ));
        assert_eq!(enriched.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn authored_fields_pass_through() {
        let mut record = bare(5, "What is an advanced form validator?", "A function.");
        record.category = Some("Forms".to_string());
        record.difficulty = Some(Difficulty::Intermediate);
        record.tags = Some(vec!["custom".to_string()]);

        let enriched = enrich_question(record);
        assert_eq!(enriched.category, "Forms");
        assert_eq!(enriched.difficulty, Difficulty::Intermediate);
        assert_eq!(enriched.tags, vec!["custom".to_string()]);
    }

    #[test]
    fn partially_authored_records_only_fill_the_gaps() {
        let mut record = bare(6, "How do router guards work?", "They gate navigation.");
        record.tags = Some(vec!["authored".to_string()]);

        let enriched = enrich_question(record);
        assert_eq!(enriched.category, "Routing");
        assert_eq!(enriched.tags, vec!["authored".to_string()]);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let records = vec![
            bare(1, "How do observables work?", "Push-based streams."),
            bare(2, "What is an expert-level scaling concern?", "Sharding."),
            bare(3, "What is a closure?", "A captured scope."),
        ];

        let once = enrich(records);
        let twice = enrich(once.iter().cloned().map(QuestionRecord::from).collect());
        assert_eq!(once, twice);
    }
}
