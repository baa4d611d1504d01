//! End-to-end study flow over the in-memory storage backend: open a topic,
//! work through it, switch modes, and come back in a fresh session.

use prep_core::Clock;
use prep_core::filter::FilterCriteria;
use prep_core::model::{QuestionId, QuestionRecord, TopicId, TraversalMode};
use services::TopicService;
use storage::repository::{QuestionRepository as _, Storage};

fn topic() -> TopicId {
    TopicId::new("angular").unwrap()
}

fn records() -> Vec<QuestionRecord> {
    vec![
        QuestionRecord::bare(
            QuestionId::new(1),
            "What is an Observable and how does it differ from a Promise?",
            "Observables are lazy push streams; promises resolve once.",
        ),
        QuestionRecord::bare(
            QuestionId::new(2),
            "How do reactive forms handle validation?",
            "Validators run on the form control and surface errors.",
        ),
        QuestionRecord::bare(
            QuestionId::new(3),
            "What does a router guard protect?",
            "Navigation into and out of routes.",
        ),
        QuestionRecord::bare(
            QuestionId::new(4),
            "How do you intercept HTTP requests?",
            "An interceptor wraps the request pipeline.",
        ),
        QuestionRecord::bare(
            QuestionId::new(5),
            "Explain change detection.",
            "The framework walks the component tree checking bindings.",
        ),
    ]
}

async fn service() -> TopicService {
    let storage = Storage::in_memory();
    storage
        .questions
        .replace_questions(&topic(), &records())
        .await
        .unwrap();
    TopicService::new(storage, Clock::default(), topic())
}

#[tokio::test]
async fn working_through_a_topic_persists_across_sessions() {
    let mut service = service().await;

    let mut session = service.open(topic()).await.unwrap();
    assert_eq!(session.question_count(), 5);
    assert_eq!(session.view().index, Some(0));

    // Study the first two questions, bookmark the third, leave a note.
    session.complete_and_advance().await;
    session.complete_and_advance().await;
    let current = session.view().question.unwrap();
    assert_eq!(current.id, QuestionId::new(3));
    session.toggle_bookmark(current.id).await;
    session.save_note(current.id, "revisit guard ordering").await;
    drop(session);

    // A fresh session over the same storage resumes exactly where we left.
    let session = service.open(topic()).await.unwrap();
    let view = session.view();
    assert_eq!(view.index, Some(2));
    assert!(view.is_bookmarked);
    assert!(!view.is_completed);
    assert_eq!(view.note, "revisit guard ordering");
}

#[tokio::test]
async fn enrichment_backs_category_filtering_end_to_end() {
    let mut service = service().await;
    let mut session = service.open(topic()).await.unwrap();

    // No category was authored; classification kicked in during the load.
    session
        .set_criteria(FilterCriteria {
            category: Some("Routing".to_string()),
            ..FilterCriteria::default()
        })
        .await;

    let view = session.view();
    assert_eq!(view.total, 1);
    assert_eq!(view.question.map(|q| q.id), Some(QuestionId::new(3)));
}

#[tokio::test]
async fn bookmarked_mode_reviews_only_saved_questions() {
    let mut service = service().await;
    let mut session = service.open(topic()).await.unwrap();

    session.toggle_bookmark(QuestionId::new(2)).await;
    session.toggle_bookmark(QuestionId::new(5)).await;
    session.set_mode(TraversalMode::Bookmarked).await.unwrap();

    let view = session.view();
    assert_eq!(view.total, 2);
    assert_eq!(view.question.map(|q| q.id), Some(QuestionId::new(2)));

    let mut session2 = service.open(topic()).await.unwrap();
    assert_eq!(session2.mode(), TraversalMode::Bookmarked);
    assert_eq!(session2.view().total, 2);

    session2.set_mode(TraversalMode::Sequential).await.unwrap();
    assert_eq!(session2.view().total, 5);
}
