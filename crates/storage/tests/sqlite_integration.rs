use chrono::Duration;
use flashcards_core::model::{Card, CardId, FlashcardSet, SectionId, SetId};
use flashcards_core::time::fixed_now;
use storage::repository::{SetRepository, StorageError};
use storage::samples::sample_sets;
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_set(id: &str, cards: &[(&str, &str, &str)]) -> FlashcardSet {
    let cards = cards.iter().map(|(card_id, term, definition)| {
        Card::new(CardId::new(*card_id).unwrap(), *term, *definition).unwrap()
    });
    FlashcardSet::new(
        SetId::new(id).unwrap(),
        "Capitals",
        Some("European capitals".into()),
        SectionId::new("science").unwrap(),
        fixed_now(),
    )
    .unwrap()
    .with_cards(cards)
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_keeps_card_order_and_flags() {
    let repo = connect("memdb_roundtrip").await;

    let mut set = build_set(
        "geo",
        &[
            ("z", "France", "Paris"),
            ("a", "Code", "```rust\nfn main() {}\n```"),
            ("m", "Area", "∫ f(x) dx"),
            ("b", "Spain", "Madrid"),
        ],
    );
    set.set_mastered(&CardId::new("b").unwrap(), true).unwrap();
    repo.upsert_set(&set).await.unwrap();

    let fetched = repo.get_set(set.id()).await.unwrap().expect("stored set");
    assert_eq!(fetched, set);

    let order: Vec<&str> = fetched.cards().iter().map(|c| c.id().as_str()).collect();
    assert_eq!(order, vec!["z", "a", "m", "b"]);
    assert!(fetched.cards()[1].has_code());
    assert!(fetched.cards()[2].has_math());
    assert_eq!(fetched.mastered_count(), 1);
    assert_eq!(fetched.description(), Some("European capitals"));
}

#[tokio::test]
async fn sqlite_upsert_replaces_cards() {
    let repo = connect("memdb_replace").await;

    let original = build_set(
        "geo",
        &[("1", "France", "Paris"), ("2", "Spain", "Madrid")],
    );
    repo.upsert_set(&original).await.unwrap();

    let edited = build_set("geo", &[("2", "Spain", "Madrid"), ("3", "Italy", "Rome")]);
    repo.upsert_set(&edited).await.unwrap();

    let fetched = repo.get_set(edited.id()).await.unwrap().unwrap();
    let ids: Vec<&str> = fetched.cards().iter().map(|c| c.id().as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(repo.list_sets().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_lists_seeded_sets_and_stamps_study_time() {
    let repo = connect("memdb_samples").await;

    for set in sample_sets(fixed_now()).unwrap() {
        repo.upsert_set(&set).await.unwrap();
    }

    let sets = repo.list_sets().await.unwrap();
    let titles: Vec<&str> = sets.iter().map(FlashcardSet::title).collect();
    // oldest first
    assert_eq!(titles, vec!["Calculus I - Derivatives", "Python Basics"]);
    assert!(sets.iter().all(|s| s.last_studied().is_none()));

    let at = fixed_now() + Duration::minutes(30);
    repo.mark_studied(sets[0].id(), at).await.unwrap();
    let fetched = repo.get_set(sets[0].id()).await.unwrap().unwrap();
    assert_eq!(fetched.last_studied(), Some(at));
    assert_eq!(fetched.created_at(), sets[0].created_at());
}

#[tokio::test]
async fn sqlite_reports_missing_sets() {
    let repo = connect("memdb_missing").await;
    let missing = SetId::new("nope").unwrap();

    assert!(repo.get_set(&missing).await.unwrap().is_none());
    let err = repo.mark_studied(&missing, fixed_now()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}
