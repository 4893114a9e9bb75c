use std::sync::Arc;

use uuid::Uuid;

use cinematch_sessions::domain::types::{Genre, Movie, Session};
use cinematch_sessions::usecase::session::{
    CreateSessionInput, CreateSessionUseCase, JoinSessionUseCase,
};
use cinematch_testing::memory::InMemoryStore;

pub const THRILLER: i32 = 1;

pub fn thriller() -> Genre {
    Genre {
        id: THRILLER,
        tmdb_id: 53,
        name: "Thriller".to_owned(),
        industry: "hollywood".to_owned(),
    }
}

pub fn movie(id: i32, title: &str, tags: &[&str]) -> Movie {
    Movie {
        id,
        tmdb_id: id * 10,
        title: title.to_owned(),
        overview: String::new(),
        release_date: chrono::NaiveDate::from_ymd_opt(1995, 6, 1),
        rating: Some(7.2),
        language: "en".to_owned(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

/// Seed the thriller genre plus `count` tagged movies (ids 1..=count).
pub fn seed_catalog(store: &Arc<InMemoryStore>, count: i32) {
    store.add_genre(thriller());
    for id in 1..=count {
        store.add_movie(movie(id, &format!("Movie {id}"), &["heist"]), &[THRILLER]);
    }
}

/// Create a session and join the guest, returning the joined session.
pub async fn ready_session(store: &Arc<InMemoryStore>, host: Uuid, guest: Uuid) -> Session {
    let create = CreateSessionUseCase {
        sessions: store.clone(),
        catalog: store.clone(),
    };
    let (session, _) = create
        .execute(
            host,
            CreateSessionInput {
                genre_id: THRILLER,
                industry: None,
            },
        )
        .await
        .unwrap();

    let join = JoinSessionUseCase {
        sessions: store.clone(),
    };
    join.execute(&session.code, guest).await.unwrap()
}
