#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cinematch_domain::pagination::PageRequest;
use cinematch_domain::reaction::Reaction;

use crate::domain::types::{
    Chemistry, EndReason, Exposure, Genre, MatchRecord, Movie, PreferenceBundle, Session,
    SessionStats, Swipe, TagRelation, TasteSignal,
};
use crate::error::SessionsServiceError;

/// Which side of the session a participant occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Host,
    Guest,
}

/// Repository for session lifecycle records.
pub trait SessionRepository: Send + Sync {
    /// Insert a new session. Returns `false` when the join code is already
    /// taken (the caller retries with a fresh code).
    async fn create(&self, session: &Session) -> Result<bool, SessionsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionsServiceError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Session>, SessionsServiceError>;

    /// Sessions where the user is host or guest, newest first.
    async fn list_for_participant(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Session>, SessionsServiceError>;

    /// Conditionally assign the guest slot. Returns `true` only for the
    /// writer that found the slot empty; a concurrent loser gets `false`.
    async fn assign_guest(
        &self,
        id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, SessionsServiceError>;

    async fn set_genre(&self, id: Uuid, genre_id: i32) -> Result<(), SessionsServiceError>;

    async fn set_preferences(
        &self,
        id: Uuid,
        role: ParticipantRole,
        prefs: &PreferenceBundle,
    ) -> Result<(), SessionsServiceError>;

    /// Mark the session ended. Returns `false` when it was already ended.
    async fn end(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<bool, SessionsServiceError>;
}

/// Read-only port onto the catalog tables (genres, movies, tags, relations).
pub trait CatalogRepository: Send + Sync {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, SessionsServiceError>;

    async fn list_genres(&self, industry: &str) -> Result<Vec<Genre>, SessionsServiceError>;

    /// Movie with its tags loaded.
    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, SessionsServiceError>;

    async fn find_movies(&self, ids: &[i32]) -> Result<Vec<Movie>, SessionsServiceError>;

    /// Candidate pool for a deck: movies in the genre (and industry, when
    /// set), excluding the given ids, capped at `limit`.
    async fn list_candidates(
        &self,
        genre_id: i32,
        industry: Option<&str>,
        exclude_movie_ids: &[i32],
        limit: u64,
    ) -> Result<Vec<Movie>, SessionsServiceError>;

    /// Outgoing tag-relation edges for any of the given tags.
    async fn outgoing_relations(
        &self,
        from_tags: &[String],
    ) -> Result<Vec<TagRelation>, SessionsServiceError>;
}

/// Append-only swipe ledger.
pub trait SwipeRepository: Send + Sync {
    /// Atomic insert-if-absent on (user, session, movie). Returns `false`
    /// when the key already exists (the duplicate-swipe code path).
    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<bool, SessionsServiceError>;

    async fn find(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Option<Swipe>, SessionsServiceError>;

    /// Delete a swipe row. Returns `true` if a row was deleted.
    async fn delete(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError>;

    /// All movie ids any participant has swiped in the session.
    async fn swiped_movie_ids(&self, session_id: Uuid) -> Result<Vec<i32>, SessionsServiceError>;

    /// Distinct users who liked the movie in the session.
    async fn likers(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Vec<Uuid>, SessionsServiceError>;

    /// A user's swipes, newest first, optionally narrowed to one session.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Swipe>, SessionsServiceError>;
}

/// Match records, one per (session, movie).
pub trait MatchRepository: Send + Sync {
    /// Atomic insert-if-absent on (session, movie). Returns `false` when the
    /// match already exists (the race-loser path, not an error).
    async fn insert_if_absent(
        &self,
        record: &MatchRecord,
    ) -> Result<bool, SessionsServiceError>;

    async fn exists(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError>;

    async fn matched_movie_ids(&self, session_id: Uuid)
    -> Result<Vec<i32>, SessionsServiceError>;

    /// Matches in any of the given sessions, newest first.
    async fn list_for_sessions(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<MatchRecord>, SessionsServiceError>;
}

/// Per-movie global exposure accounting.
pub trait ExposureRepository: Send + Sync {
    async fn get_many(&self, movie_ids: &[i32]) -> Result<Vec<Exposure>, SessionsServiceError>;

    /// Atomically bump count and recency (count += 1, last_exposed = now).
    async fn bump(
        &self,
        movie_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError>;
}

/// Per-(user, tag) taste counters.
pub trait TasteSignalRepository: Send + Sync {
    async fn get_many(
        &self,
        user_id: Uuid,
        tags: &[String],
    ) -> Result<Vec<TasteSignal>, SessionsServiceError>;

    /// Atomically bump the like or dislike counter for one tag.
    async fn bump(
        &self,
        user_id: Uuid,
        tag: &str,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError>;
}

/// Per-(normalized pair, tag) chemistry counters.
pub trait ChemistryRepository: Send + Sync {
    async fn get_for_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<Chemistry>, SessionsServiceError>;

    async fn bump_swipe(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
    ) -> Result<(), SessionsServiceError>;

    async fn bump_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError>;
}

/// Rolling session stats.
pub trait StatsRepository: Send + Sync {
    async fn get(&self, session_id: Uuid)
    -> Result<Option<SessionStats>, SessionsServiceError>;

    async fn incr_swipes(&self, session_id: Uuid) -> Result<(), SessionsServiceError>;

    async fn incr_matches(&self, session_id: Uuid) -> Result<(), SessionsServiceError>;

    /// Write the end-of-session fields.
    async fn finalize(
        &self,
        session_id: Uuid,
        duration_ms: i64,
        ended_by: EndReason,
        quality_score: i32,
        highlights: &[String],
    ) -> Result<(), SessionsServiceError>;
}

// ── Blanket `Arc` impls ──────────────────────────────────────────────────────
//
// A shared handle to a repository is itself a repository, so callers can hold
// one store behind several `Arc` clones (mirrors the `Notifier` blanket impl
// in `realtime`).

impl<T: SessionRepository + ?Sized> SessionRepository for std::sync::Arc<T> {
    async fn create(&self, session: &Session) -> Result<bool, SessionsServiceError> {
        (**self).create(session).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionsServiceError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Session>, SessionsServiceError> {
        (**self).find_by_code(code).await
    }

    async fn list_for_participant(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Session>, SessionsServiceError> {
        (**self).list_for_participant(user_id).await
    }

    async fn assign_guest(
        &self,
        id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, SessionsServiceError> {
        (**self).assign_guest(id, guest_id).await
    }

    async fn set_genre(&self, id: Uuid, genre_id: i32) -> Result<(), SessionsServiceError> {
        (**self).set_genre(id, genre_id).await
    }

    async fn set_preferences(
        &self,
        id: Uuid,
        role: ParticipantRole,
        prefs: &PreferenceBundle,
    ) -> Result<(), SessionsServiceError> {
        (**self).set_preferences(id, role, prefs).await
    }

    async fn end(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<bool, SessionsServiceError> {
        (**self).end(id, ended_at).await
    }
}

impl<T: CatalogRepository + ?Sized> CatalogRepository for std::sync::Arc<T> {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, SessionsServiceError> {
        (**self).find_genre(id).await
    }

    async fn list_genres(&self, industry: &str) -> Result<Vec<Genre>, SessionsServiceError> {
        (**self).list_genres(industry).await
    }

    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, SessionsServiceError> {
        (**self).find_movie(id).await
    }

    async fn find_movies(&self, ids: &[i32]) -> Result<Vec<Movie>, SessionsServiceError> {
        (**self).find_movies(ids).await
    }

    async fn list_candidates(
        &self,
        genre_id: i32,
        industry: Option<&str>,
        exclude_movie_ids: &[i32],
        limit: u64,
    ) -> Result<Vec<Movie>, SessionsServiceError> {
        (**self)
            .list_candidates(genre_id, industry, exclude_movie_ids, limit)
            .await
    }

    async fn outgoing_relations(
        &self,
        from_tags: &[String],
    ) -> Result<Vec<TagRelation>, SessionsServiceError> {
        (**self).outgoing_relations(from_tags).await
    }
}

impl<T: SwipeRepository + ?Sized> SwipeRepository for std::sync::Arc<T> {
    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<bool, SessionsServiceError> {
        (**self).insert_if_absent(swipe).await
    }

    async fn find(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Option<Swipe>, SessionsServiceError> {
        (**self).find(user_id, session_id, movie_id).await
    }

    async fn delete(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError> {
        (**self).delete(user_id, session_id, movie_id).await
    }

    async fn swiped_movie_ids(&self, session_id: Uuid) -> Result<Vec<i32>, SessionsServiceError> {
        (**self).swiped_movie_ids(session_id).await
    }

    async fn likers(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Vec<Uuid>, SessionsServiceError> {
        (**self).likers(session_id, movie_id).await
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Swipe>, SessionsServiceError> {
        (**self).list_for_user(user_id, session_id, page).await
    }
}

impl<T: MatchRepository + ?Sized> MatchRepository for std::sync::Arc<T> {
    async fn insert_if_absent(
        &self,
        record: &MatchRecord,
    ) -> Result<bool, SessionsServiceError> {
        (**self).insert_if_absent(record).await
    }

    async fn exists(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError> {
        (**self).exists(session_id, movie_id).await
    }

    async fn matched_movie_ids(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<i32>, SessionsServiceError> {
        (**self).matched_movie_ids(session_id).await
    }

    async fn list_for_sessions(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<MatchRecord>, SessionsServiceError> {
        (**self).list_for_sessions(session_ids).await
    }
}

impl<T: ExposureRepository + ?Sized> ExposureRepository for std::sync::Arc<T> {
    async fn get_many(&self, movie_ids: &[i32]) -> Result<Vec<Exposure>, SessionsServiceError> {
        (**self).get_many(movie_ids).await
    }

    async fn bump(
        &self,
        movie_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        (**self).bump(movie_id, now).await
    }
}

impl<T: TasteSignalRepository + ?Sized> TasteSignalRepository for std::sync::Arc<T> {
    async fn get_many(
        &self,
        user_id: Uuid,
        tags: &[String],
    ) -> Result<Vec<TasteSignal>, SessionsServiceError> {
        (**self).get_many(user_id, tags).await
    }

    async fn bump(
        &self,
        user_id: Uuid,
        tag: &str,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        (**self).bump(user_id, tag, reaction, now).await
    }
}

impl<T: ChemistryRepository + ?Sized> ChemistryRepository for std::sync::Arc<T> {
    async fn get_for_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<Chemistry>, SessionsServiceError> {
        (**self).get_for_pair(user_a, user_b).await
    }

    async fn bump_swipe(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
    ) -> Result<(), SessionsServiceError> {
        (**self).bump_swipe(user_a, user_b, tag).await
    }

    async fn bump_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        (**self).bump_match(user_a, user_b, tag, now).await
    }
}

impl<T: StatsRepository + ?Sized> StatsRepository for std::sync::Arc<T> {
    async fn get(
        &self,
        session_id: Uuid,
    ) -> Result<Option<SessionStats>, SessionsServiceError> {
        (**self).get(session_id).await
    }

    async fn incr_swipes(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        (**self).incr_swipes(session_id).await
    }

    async fn incr_matches(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        (**self).incr_matches(session_id).await
    }

    async fn finalize(
        &self,
        session_id: Uuid,
        duration_ms: i64,
        ended_by: EndReason,
        quality_score: i32,
        highlights: &[String],
    ) -> Result<(), SessionsServiceError> {
        (**self)
            .finalize(session_id, duration_ms, ended_by, quality_score, highlights)
            .await
    }
}
