//! Read views over a user's swipe ledger and matches.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cinematch_domain::pagination::PageRequest;
use cinematch_domain::reaction::Reaction;

use crate::domain::repository::{
    CatalogRepository, MatchRepository, SessionRepository, SwipeRepository,
};
use crate::error::SessionsServiceError;

#[derive(Debug, Clone)]
pub struct SwipeHistoryEntry {
    pub session_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    pub reaction: Reaction,
    pub created_at: DateTime<Utc>,
}

/// A user's own swipes, newest first, optionally narrowed to one session.
pub struct SwipeHistoryUseCase<W: SwipeRepository, C: CatalogRepository> {
    pub swipes: W,
    pub catalog: C,
}

impl<W: SwipeRepository, C: CatalogRepository> SwipeHistoryUseCase<W, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<SwipeHistoryEntry>, SessionsServiceError> {
        let swipes = self
            .swipes
            .list_for_user(user_id, session_id, page.clamped())
            .await?;
        if swipes.is_empty() {
            return Ok(vec![]);
        }

        let mut movie_ids: Vec<i32> = swipes.iter().map(|s| s.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();
        let titles: HashMap<i32, String> = self
            .catalog
            .find_movies(&movie_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m.title))
            .collect();

        Ok(swipes
            .into_iter()
            .map(|s| SwipeHistoryEntry {
                session_id: s.session_id,
                movie_id: s.movie_id,
                // A movie removed from the catalog after the swipe keeps the
                // row; the title just goes blank.
                title: titles.get(&s.movie_id).cloned().unwrap_or_default(),
                reaction: s.reaction,
                created_at: s.created_at,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct MatchEntry {
    pub session_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Every match across the sessions the user took part in, newest first.
pub struct ListMatchesUseCase<S, M, C>
where
    S: SessionRepository,
    M: MatchRepository,
    C: CatalogRepository,
{
    pub sessions: S,
    pub matches: M,
    pub catalog: C,
}

impl<S, M, C> ListMatchesUseCase<S, M, C>
where
    S: SessionRepository,
    M: MatchRepository,
    C: CatalogRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MatchEntry>, SessionsServiceError> {
        let sessions = self.sessions.list_for_participant(user_id).await?;
        if sessions.is_empty() {
            return Ok(vec![]);
        }
        let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let records = self.matches.list_for_sessions(&session_ids).await?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let mut movie_ids: Vec<i32> = records.iter().map(|r| r.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();
        let titles: HashMap<i32, String> = self
            .catalog
            .find_movies(&movie_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m.title))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| MatchEntry {
                session_id: r.session_id,
                movie_id: r.movie_id,
                title: titles.get(&r.movie_id).cloned().unwrap_or_default(),
                created_at: r.created_at,
            })
            .collect())
    }
}
