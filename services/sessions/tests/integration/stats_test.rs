use chrono::{Duration, Utc};
use uuid::Uuid;

use cinematch_sessions::domain::repository::{SessionRepository as _, StatsRepository as _};
use cinematch_sessions::domain::types::{EndReason, Session};
use cinematch_sessions::error::SessionsServiceError;
use cinematch_sessions::usecase::session::EndSessionUseCase;
use cinematch_sessions::usecase::stats::GetSessionStatsUseCase;
use cinematch_testing::memory::{InMemoryStore, RecordingNotifier};

use crate::helpers::{seed_catalog, THRILLER};

/// A ready session that started six minutes ago.
fn aged_session(host: Uuid, guest: Uuid) -> Session {
    Session {
        id: Uuid::now_v7(),
        code: "AGED01".to_owned(),
        host_id: host,
        guest_id: Some(guest),
        genre_id: THRILLER,
        industry: None,
        host_prefs: None,
        guest_prefs: None,
        created_at: Utc::now() - Duration::minutes(6),
        ended_at: None,
    }
}

#[tokio::test]
async fn should_finalize_quality_score_for_full_session() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = aged_session(host, Uuid::new_v4());
    assert!(store.create(&session).await.unwrap());

    for _ in 0..20 {
        store.incr_swipes(session.id).await.unwrap();
    }
    for _ in 0..3 {
        store.incr_matches(session.id).await.unwrap();
    }

    let end = EndSessionUseCase {
        sessions: store.clone(),
        stats: store.clone(),
        notifier: RecordingNotifier::new(),
    };
    end.execute(session.id, host, EndReason::NoMoreMovies)
        .await
        .unwrap();

    // 20 swipes / 3 matches / ~6 minutes: efficiency 15, matches 30, depth 10.
    let stats = store.stats(session.id).unwrap();
    assert_eq!(stats.quality_score, Some(55));
    assert_eq!(stats.ended_by, Some(EndReason::NoMoreMovies));
    assert_eq!(
        stats.highlights,
        vec!["multiple-matches".to_owned(), "good-flow".to_owned()]
    );
    assert!(stats.duration_ms.unwrap() >= 6 * 60_000);
}

#[tokio::test]
async fn should_serve_rolling_stats_to_participants_only() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let session = aged_session(host, guest);
    store.create(&session).await.unwrap();
    store.incr_swipes(session.id).await.unwrap();

    let uc = GetSessionStatsUseCase {
        sessions: store.clone(),
        stats: store.clone(),
    };
    let stats = uc.execute(session.id, guest).await.unwrap();
    assert_eq!(stats.total_swipes, 1);
    assert_eq!(stats.quality_score, None, "not finalized yet");

    let err = uc.execute(session.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, SessionsServiceError::NotParticipant));
}

#[tokio::test]
async fn should_report_empty_stats_before_any_swipe() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = aged_session(host, Uuid::new_v4());
    store.create(&session).await.unwrap();

    let uc = GetSessionStatsUseCase {
        sessions: store.clone(),
        stats: store.clone(),
    };
    let stats = uc.execute(session.id, host).await.unwrap();
    assert_eq!(stats.total_swipes, 0);
    assert_eq!(stats.total_matches, 0);
    assert!(stats.highlights.is_empty());
}
