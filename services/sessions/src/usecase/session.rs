use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::domain::repository::{
    CatalogRepository, SessionRepository, StatsRepository, SwipeRepository,
};
use crate::domain::types::{EndReason, Genre, Session, SessionStats};
use crate::error::SessionsServiceError;
use crate::realtime::{Notifier, SessionEvent};
use crate::usecase::stats::quality_report;

/// Charset for join codes (uppercase alphanumeric).
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

/// How many fresh codes to try before giving up on a collision streak.
const CODE_ATTEMPTS: usize = 3;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

// ── CreateSession ────────────────────────────────────────────────────────────

pub struct CreateSessionInput {
    pub genre_id: i32,
    pub industry: Option<String>,
}

pub struct CreateSessionUseCase<S: SessionRepository, C: CatalogRepository> {
    pub sessions: S,
    pub catalog: C,
}

impl<S: SessionRepository, C: CatalogRepository> CreateSessionUseCase<S, C> {
    pub async fn execute(
        &self,
        host_id: Uuid,
        input: CreateSessionInput,
    ) -> Result<(Session, Genre), SessionsServiceError> {
        let genre = self
            .catalog
            .find_genre(input.genre_id)
            .await?
            .ok_or(SessionsServiceError::GenreNotFound)?;

        // Collisions on the 6-char code are rare; retry with a fresh code a
        // few times before surfacing the conflict to the caller.
        for _ in 0..CODE_ATTEMPTS {
            let session = Session {
                id: Uuid::now_v7(),
                code: generate_code(),
                host_id,
                guest_id: None,
                genre_id: genre.id,
                industry: input.industry.clone(),
                host_prefs: None,
                guest_prefs: None,
                created_at: Utc::now(),
                ended_at: None,
            };
            if self.sessions.create(&session).await? {
                return Ok((session, genre));
            }
        }
        Err(SessionsServiceError::CodeCollision)
    }
}

// ── JoinSession ──────────────────────────────────────────────────────────────

pub struct JoinSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> JoinSessionUseCase<S> {
    pub async fn execute(
        &self,
        code: &str,
        user_id: Uuid,
    ) -> Result<Session, SessionsServiceError> {
        if code.is_empty() {
            return Err(SessionsServiceError::MissingData);
        }
        let session = self
            .sessions
            .find_by_code(code)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        if session.host_id == user_id {
            return Err(SessionsServiceError::HostCannotJoin);
        }
        if session.guest_id.is_some() {
            return Err(SessionsServiceError::GuestSlotFull);
        }

        // Conditional update on the empty slot: exactly one concurrent
        // joiner wins, the loser sees the slot already taken.
        if !self.sessions.assign_guest(session.id, user_id).await? {
            return Err(SessionsServiceError::GuestSlotFull);
        }

        Ok(Session {
            guest_id: Some(user_id),
            ..session
        })
    }
}

// ── SetGenre ─────────────────────────────────────────────────────────────────

pub struct SetGenreUseCase<S: SessionRepository, C: CatalogRepository, W: SwipeRepository> {
    pub sessions: S,
    pub catalog: C,
    pub swipes: W,
}

impl<S: SessionRepository, C: CatalogRepository, W: SwipeRepository> SetGenreUseCase<S, C, W> {
    pub async fn execute(
        &self,
        session_id: Uuid,
        genre_id: i32,
        requester: Uuid,
    ) -> Result<(), SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        if session.host_id != requester {
            return Err(SessionsServiceError::HostOnly);
        }
        if !session.is_active() {
            return Err(SessionsServiceError::SessionEnded);
        }
        // Changing genre mid-session would desynchronize the deck and the
        // affinity counters already accumulated against it.
        if !self.swipes.swiped_movie_ids(session_id).await?.is_empty() {
            return Err(SessionsServiceError::GenreLocked);
        }
        if self.catalog.find_genre(genre_id).await?.is_none() {
            return Err(SessionsServiceError::GenreNotFound);
        }

        self.sessions.set_genre(session_id, genre_id).await
    }
}

// ── EndSession ───────────────────────────────────────────────────────────────

pub struct EndSessionUseCase<S, ST, N>
where
    S: SessionRepository,
    ST: StatsRepository,
    N: Notifier,
{
    pub sessions: S,
    pub stats: ST,
    pub notifier: N,
}

impl<S, ST, N> EndSessionUseCase<S, ST, N>
where
    S: SessionRepository,
    ST: StatsRepository,
    N: Notifier,
{
    pub async fn execute(
        &self,
        session_id: Uuid,
        requester: Uuid,
        reason: EndReason,
    ) -> Result<(), SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        if !session.is_participant(requester) {
            return Err(SessionsServiceError::NotParticipant);
        }

        let ended_at = Utc::now();
        if !self.sessions.end(session_id, ended_at).await? {
            return Err(SessionsServiceError::SessionAlreadyEnded);
        }

        // Stats finalization and the broadcast are secondary: the session is
        // ended either way.
        let totals = match self.stats.get(session_id).await {
            Ok(stats) => stats.unwrap_or_else(|| SessionStats::empty(session_id)),
            Err(e) => {
                tracing::warn!(error = %e, %session_id, "failed to read stats at session end");
                SessionStats::empty(session_id)
            }
        };
        let duration_ms = (ended_at - session.created_at).num_milliseconds().max(0);
        let report = quality_report(totals.total_swipes, totals.total_matches, duration_ms);
        if let Err(e) = self
            .stats
            .finalize(
                session_id,
                duration_ms,
                reason,
                report.score,
                &report.highlights,
            )
            .await
        {
            tracing::warn!(error = %e, %session_id, "failed to finalize session stats");
        }

        self.notifier
            .publish(session_id, SessionEvent::SessionEnded { session_id });
        Ok(())
    }
}

// ── GetSession / SessionStatus ───────────────────────────────────────────────

pub struct GetSessionUseCase<S: SessionRepository, C: CatalogRepository> {
    pub sessions: S,
    pub catalog: C,
}

impl<S: SessionRepository, C: CatalogRepository> GetSessionUseCase<S, C> {
    pub async fn execute(
        &self,
        session_id: Uuid,
        requester: Uuid,
    ) -> Result<(Session, Genre), SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;
        if !session.is_participant(requester) {
            return Err(SessionsServiceError::NotParticipant);
        }
        let genre = self
            .catalog
            .find_genre(session.genre_id)
            .await?
            .ok_or(SessionsServiceError::GenreNotFound)?;
        Ok((session, genre))
    }
}

/// Public status lookup by join code, used before joining.
pub struct SessionStatusUseCase<S: SessionRepository, C: CatalogRepository> {
    pub sessions: S,
    pub catalog: C,
}

impl<S: SessionRepository, C: CatalogRepository> SessionStatusUseCase<S, C> {
    pub async fn execute(
        &self,
        code: &str,
    ) -> Result<(Session, Option<Genre>), SessionsServiceError> {
        if code.is_empty() {
            return Err(SessionsServiceError::MissingData);
        }
        let session = self
            .sessions
            .find_by_code(code)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;
        let genre = self.catalog.find_genre(session.genre_id).await?;
        Ok((session, genre))
    }
}

// ── ListGenres ───────────────────────────────────────────────────────────────

pub struct ListGenresUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListGenresUseCase<C> {
    pub async fn execute(&self, industry: &str) -> Result<Vec<Genre>, SessionsServiceError> {
        if industry.is_empty() {
            return Err(SessionsServiceError::MissingData);
        }
        self.catalog.list_genres(industry).await
    }
}
