use uuid::Uuid;

use cinematch_domain::reaction::Reaction;
use cinematch_sessions::domain::repository::{
    ChemistryRepository as _, SwipeRepository as _, TasteSignalRepository as _,
};
use cinematch_sessions::domain::types::normalize_pair;
use cinematch_sessions::error::SessionsServiceError;
use cinematch_sessions::realtime::SessionEvent;
use cinematch_sessions::usecase::deck::BuildDeckUseCase;
use cinematch_sessions::usecase::swipe::{RecordSwipeUseCase, UndoSwipeUseCase};
use cinematch_testing::memory::{InMemoryStore, RecordingNotifier};

use crate::helpers::{ready_session, seed_catalog};

fn record_swipe_usecase(
    store: &std::sync::Arc<InMemoryStore>,
    notifier: &std::sync::Arc<RecordingNotifier>,
) -> RecordSwipeUseCase<
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<RecordingNotifier>,
> {
    RecordSwipeUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
        taste: store.clone(),
        chemistry: store.clone(),
        stats: store.clone(),
        notifier: notifier.clone(),
    }
}

fn build_deck_usecase(
    store: &std::sync::Arc<InMemoryStore>,
) -> BuildDeckUseCase<
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
    std::sync::Arc<InMemoryStore>,
> {
    BuildDeckUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
        exposures: store.clone(),
        taste: store.clone(),
        chemistry: store.clone(),
        stats: store.clone(),
    }
}

#[tokio::test]
async fn should_match_when_both_participants_like() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = ready_session(&store, host, guest).await;
    let notifier = RecordingNotifier::new();
    let uc = record_swipe_usecase(&store, &notifier);

    let first = uc
        .execute(session.id, host, 1, Reaction::Like)
        .await
        .unwrap();
    assert!(!first.matched, "a single like is not a match");

    let second = uc
        .execute(session.id, guest, 1, Reaction::Like)
        .await
        .unwrap();
    assert!(second.matched);
    assert_eq!(store.match_count(session.id), 1);

    let stats = store.stats(session.id).unwrap();
    assert_eq!(stats.total_swipes, 2);
    assert_eq!(stats.total_matches, 1);

    let match_events: Vec<_> = notifier
        .events()
        .into_iter()
        .filter(|(_, e)| matches!(e, SessionEvent::Match { .. }))
        .collect();
    assert_eq!(
        match_events,
        vec![(
            session.id,
            SessionEvent::Match {
                session_id: session.id,
                movie_id: 1,
                title: "Movie 1".to_owned(),
            }
        )]
    );

    // Both taste and pair chemistry counters picked up the movie's tag.
    let taste = store
        .get_many(host, &["heist".to_owned()])
        .await
        .unwrap();
    assert_eq!(taste[0].like_count, 1);
    let (a, b) = normalize_pair(host, guest);
    let chemistry = store.get_for_pair(a, b).await.unwrap();
    assert_eq!(chemistry.len(), 1);
    assert_eq!(chemistry[0].swipe_count, 2);
    assert_eq!(chemistry[0].match_count, 1);
}

#[tokio::test]
async fn should_create_at_most_one_match_under_concurrent_likes() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = ready_session(&store, host, guest).await;
    let notifier = RecordingNotifier::new();
    let uc = record_swipe_usecase(&store, &notifier);

    let (a, b) = tokio::join!(
        uc.execute(session.id, host, 1, Reaction::Like),
        uc.execute(session.id, guest, 1, Reaction::Like),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(store.match_count(session.id), 1);
    let match_events = notifier
        .events()
        .iter()
        .filter(|(_, e)| matches!(e, SessionEvent::Match { .. }))
        .count();
    assert_eq!(match_events, 1, "only the race winner may announce the match");
    assert_eq!(store.stats(session.id).unwrap().total_matches, 1);
}

#[tokio::test]
async fn should_never_match_on_dislikes_and_exclude_them_from_the_deck() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 20);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = ready_session(&store, host, guest).await;
    let notifier = RecordingNotifier::new();
    let uc = record_swipe_usecase(&store, &notifier);

    uc.execute(session.id, host, 1, Reaction::Dislike)
        .await
        .unwrap();
    uc.execute(session.id, guest, 1, Reaction::Dislike)
        .await
        .unwrap();

    assert_eq!(store.match_count(session.id), 0);

    let deck = build_deck_usecase(&store)
        .execute(session.id, host)
        .await
        .unwrap();
    assert!(
        deck.movies.iter().all(|m| m.id != 1),
        "a swiped movie must not reappear"
    );
}

#[tokio::test]
async fn should_reject_duplicate_swipe() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;
    let uc = record_swipe_usecase(&store, &RecordingNotifier::new());

    uc.execute(session.id, host, 1, Reaction::Like).await.unwrap();
    let err = uc
        .execute(session.id, host, 1, Reaction::Dislike)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionsServiceError::DuplicateSwipe));
}

#[tokio::test]
async fn should_reject_swipe_before_guest_joins() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let create = cinematch_sessions::usecase::session::CreateSessionUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
    };
    let (session, _) = create
        .execute(
            host,
            cinematch_sessions::usecase::session::CreateSessionInput {
                genre_id: crate::helpers::THRILLER,
                industry: None,
            },
        )
        .await
        .unwrap();

    let uc = record_swipe_usecase(&store, &RecordingNotifier::new());
    let err = uc
        .execute(session.id, host, 1, Reaction::Like)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionsServiceError::SessionNotReady));
}

#[tokio::test]
async fn should_undo_fresh_swipe_and_allow_reswiping() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;
    let swipes = record_swipe_usecase(&store, &RecordingNotifier::new());

    swipes
        .execute(session.id, host, 1, Reaction::Like)
        .await
        .unwrap();

    let undo = UndoSwipeUseCase {
        sessions: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
    };
    undo.execute(session.id, host, 1).await.unwrap();

    assert!(store.find(host, session.id, 1).await.unwrap().is_none());
    // The slot is free again.
    swipes
        .execute(session.id, host, 1, Reaction::Dislike)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_not_undo_a_matched_swipe() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = ready_session(&store, host, guest).await;
    let swipes = record_swipe_usecase(&store, &RecordingNotifier::new());

    swipes
        .execute(session.id, host, 1, Reaction::Like)
        .await
        .unwrap();
    swipes
        .execute(session.id, guest, 1, Reaction::Like)
        .await
        .unwrap();

    let undo = UndoSwipeUseCase {
        sessions: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
    };
    let err = undo.execute(session.id, host, 1).await.unwrap_err();
    assert!(matches!(err, SessionsServiceError::UndoAfterMatch));
    assert_eq!(store.match_count(session.id), 1);
}
