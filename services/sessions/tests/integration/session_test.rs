use uuid::Uuid;

use cinematch_sessions::error::SessionsServiceError;
use cinematch_sessions::realtime::SessionEvent;
use cinematch_sessions::usecase::session::{EndSessionUseCase, JoinSessionUseCase};
use cinematch_sessions::domain::types::EndReason;
use cinematch_testing::memory::{InMemoryStore, RecordingNotifier};

use crate::helpers::{ready_session, seed_catalog};

#[tokio::test]
async fn should_create_and_join_session() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let guest = Uuid::new_v4();

    let session = ready_session(&store, host, guest).await;

    assert_eq!(session.code.len(), 6);
    assert_eq!(session.host_id, host);
    assert_eq!(session.guest_id, Some(guest));

    let stored = store.session(session.id).unwrap();
    assert_eq!(stored.guest_id, Some(guest), "join must be persisted");
}

#[tokio::test]
async fn should_reject_host_joining_own_session() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;

    let join = JoinSessionUseCase {
        sessions: store.clone(),
    };
    // The slot is taken, but the host is rejected for being the host first.
    let err = join.execute(&session.code, host).await.unwrap_err();
    assert!(matches!(err, SessionsServiceError::HostCannotJoin));
}

#[tokio::test]
async fn should_reject_second_guest() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let session = ready_session(&store, Uuid::new_v4(), Uuid::new_v4()).await;

    let join = JoinSessionUseCase {
        sessions: store.clone(),
    };
    let err = join.execute(&session.code, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, SessionsServiceError::GuestSlotFull));
}

#[tokio::test]
async fn should_end_session_once_and_broadcast() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let host = Uuid::new_v4();
    let session = ready_session(&store, host, Uuid::new_v4()).await;
    let notifier = RecordingNotifier::new();

    let end = EndSessionUseCase {
        sessions: store.clone(),
        stats: store.clone(),
        notifier: notifier.clone(),
    };
    end.execute(session.id, host, EndReason::User).await.unwrap();

    assert!(store.session(session.id).unwrap().ended_at.is_some());
    let stats = store.stats(session.id).unwrap();
    assert_eq!(stats.ended_by, Some(EndReason::User));
    assert!(stats.quality_score.is_some());
    assert_eq!(
        notifier.events(),
        vec![(
            session.id,
            SessionEvent::SessionEnded {
                session_id: session.id
            }
        )]
    );

    let err = end
        .execute(session.id, host, EndReason::User)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionsServiceError::SessionAlreadyEnded));
}

#[tokio::test]
async fn should_not_let_outsider_end_session() {
    let store = InMemoryStore::new();
    seed_catalog(&store, 5);
    let session = ready_session(&store, Uuid::new_v4(), Uuid::new_v4()).await;

    let end = EndSessionUseCase {
        sessions: store.clone(),
        stats: store.clone(),
        notifier: RecordingNotifier::new(),
    };
    let err = end
        .execute(session.id, Uuid::new_v4(), EndReason::User)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionsServiceError::NotParticipant));
    assert!(store.session(session.id).unwrap().ended_at.is_none());
}
