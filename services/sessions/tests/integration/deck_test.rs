use std::sync::Arc;

use uuid::Uuid;

use cinematch_domain::reaction::Reaction;
use cinematch_sessions::domain::repository::StatsRepository as _;
use cinematch_sessions::error::SessionsServiceError;
use cinematch_sessions::usecase::deck::BuildDeckUseCase;
use cinematch_sessions::usecase::swipe::RecordSwipeUseCase;
use cinematch_testing::memory::{InMemoryStore, RecordingNotifier};

use crate::helpers::{ready_session, seed_catalog};

fn deck_usecase(
    store: &Arc<InMemoryStore>,
) -> BuildDeckUseCase<
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
    Arc<InMemoryStore>,
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
async fn should_deal_a_wide_deck_to_a_fresh_session() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 60);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;

    let deck = deck_usecase(&store).execute(session.id, host).await.unwrap();

    assert_eq!(deck.session_id, session.id);
    assert_eq!(deck.genre, "Thriller");
    // Fewer than ten swipes so far, so the deck explores wide.
    assert_eq!(deck.movies.len(), 50);
    for movie in &deck.movies {
        let exposure = store.exposure(movie.id).unwrap();
        assert_eq!(exposure.exposed_count, 1, "each deal bumps exposure once");
        assert!(exposure.last_exposed_at.is_some());
    }
}

#[tokio::test]
async fn should_tighten_deck_once_pair_is_matching() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 60);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;

    for _ in 0..12 {
        store.incr_swipes(session.id).await.unwrap();
    }
    store.incr_matches(session.id).await.unwrap();
    store.incr_matches(session.id).await.unwrap();

    let deck = deck_usecase(&store).execute(session.id, host).await.unwrap();
    assert_eq!(deck.movies.len(), 16);
}

#[tokio::test]
async fn should_exclude_movies_either_participant_swiped() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 20);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = ready_session(&store, host, guest).await;

    let swipes = RecordSwipeUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
        taste: store.clone(),
        chemistry: store.clone(),
        stats: store.clone(),
        notifier: RecordingNotifier::new(),
    };
    swipes
        .execute(session.id, host, 3, Reaction::Like)
        .await
        .unwrap();

    // The guest's deck must not re-offer a movie the host already acted on.
    let deck = deck_usecase(&store).execute(session.id, guest).await.unwrap();
    assert!(deck.movies.iter().all(|m| m.id != 3));
    assert_eq!(deck.movies.len(), 19);
}

#[tokio::test]
async fn should_deal_empty_deck_when_pool_is_exhausted() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 1);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;

    let swipes = RecordSwipeUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
        swipes: store.clone(),
        matches: store.clone(),
        taste: store.clone(),
        chemistry: store.clone(),
        stats: store.clone(),
        notifier: RecordingNotifier::new(),
    };
    swipes
        .execute(session.id, host, 1, Reaction::Dislike)
        .await
        .unwrap();

    let deck = deck_usecase(&store).execute(session.id, host).await.unwrap();
    assert!(deck.movies.is_empty());
    assert_eq!(deck.genre, "Thriller");
}

#[tokio::test]
async fn should_not_deal_to_outsiders() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let session = ready_session(&store, Uuid::new_v4(), Uuid::new_v4()).await;

    let err = deck_usecase(&store)
        .execute(session.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionsServiceError::NotParticipant));
}
