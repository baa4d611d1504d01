use prep_core::model::{
    Difficulty, QuestionId, QuestionRecord, TopicId, TopicProgress, TraversalMode,
};
use prep_core::time::fixed_now;
use storage::repository::{ProgressRepository, QuestionRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn topic(name: &str) -> TopicId {
    TopicId::new(name).unwrap()
}

fn sample_records() -> Vec<QuestionRecord> {
    let mut tagged = QuestionRecord::bare(
        QuestionId::new(2),
        "What is lazy loading?",
        "Deferring a bundle until its route is visited.",
    );
    tagged.category = Some("Performance".to_string());
    tagged.difficulty = Some(Difficulty::Advanced);
    tagged.tags = Some(vec!["performance".to_string(), "free text tag".to_string()]);

    vec![
        QuestionRecord::bare(
            QuestionId::new(5),
            "What is a router guard?",
            "A gate on navigation.",
        ),
        tagged,
    ]
}

#[tokio::test]
async fn sqlite_roundtrips_question_sets_in_position_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_questions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let topic = topic("angular");
    let records = sample_records();
    repo.replace_questions(&topic, &records).await.unwrap();

    let fetched = repo.topic_questions(&topic).await.unwrap();
    // Authored order is preserved even though ids are not sorted.
    assert_eq!(fetched, records);

    // Replacing shrinks the set rather than accumulating.
    repo.replace_questions(&topic, &records[..1]).await.unwrap();
    let fetched = repo.topic_questions(&topic).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, QuestionId::new(5));

    // Emptying the set makes the topic read as unknown again.
    repo.replace_questions(&topic, &[]).await.unwrap();
    let err = repo.topic_questions(&topic).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_reports_unknown_topics_as_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_unknown?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let err = repo.topic_questions(&topic("vanished")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_roundtrips_progress_per_topic() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let angular = topic("angular");
    let react = topic("react");

    let mut progress = TopicProgress::new(fixed_now());
    progress.mark_complete(QuestionId::new(1));
    progress.mark_complete(QuestionId::new(2));
    progress.toggle_bookmark(QuestionId::new(3));
    progress.save_note(QuestionId::new(3), "re-read the docs");
    progress.save_note(QuestionId::new(4), "");
    progress.set_mode(TraversalMode::Random);
    progress.set_cursor(7);

    repo.save_progress(&angular, &progress).await.unwrap();

    let loaded = repo.get_progress(&angular).await.unwrap().unwrap();
    assert_eq!(loaded, progress);
    // Empty notes survive as empty strings, not deletions.
    assert_eq!(loaded.note(QuestionId::new(4)), Some(""));

    // Progress keys are scoped per topic.
    assert_eq!(repo.get_progress(&react).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_save_progress_replaces_prior_state() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let angular = topic("angular");

    let mut progress = TopicProgress::new(fixed_now());
    progress.mark_complete(QuestionId::new(1));
    progress.toggle_bookmark(QuestionId::new(2));
    repo.save_progress(&angular, &progress).await.unwrap();

    progress.reset(prep_core::model::ResetScope::All);
    repo.save_progress(&angular, &progress).await.unwrap();

    let loaded = repo.get_progress(&angular).await.unwrap().unwrap();
    assert!(loaded.completed().is_empty());
    assert!(loaded.bookmarked().is_empty());
    assert!(loaded.notes().is_empty());
}
