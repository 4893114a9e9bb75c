//! In-memory repository implementations.
//!
//! Every trait is implemented on `InMemoryStore` (and reachable through
//! `Arc<InMemoryStore>` via the blanket `Arc` impls on the repository
//! traits), so cloning the handle shares one store across all the use cases
//! under test. The insert-if-absent
//! and conditional-update semantics mirror the database-backed repositories
//! exactly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cinematch_domain::pagination::PageRequest;
use cinematch_domain::reaction::Reaction;

use cinematch_sessions::domain::repository::{
    CatalogRepository, ChemistryRepository, ExposureRepository, MatchRepository, ParticipantRole,
    SessionRepository, StatsRepository, SwipeRepository, TasteSignalRepository,
};
use cinematch_sessions::domain::types::{
    Chemistry, EndReason, Exposure, Genre, MatchRecord, Movie, PreferenceBundle, Session,
    SessionStats, Swipe, TagRelation, TasteSignal,
};
use cinematch_sessions::error::SessionsServiceError;
use cinematch_sessions::realtime::{Notifier, SessionEvent};

#[derive(Default)]
pub struct InMemoryStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    genres: Mutex<HashMap<i32, Genre>>,
    movies: Mutex<HashMap<i32, Movie>>,
    movie_genres: Mutex<HashMap<i32, Vec<i32>>>,
    relations: Mutex<Vec<TagRelation>>,
    swipes: Mutex<HashMap<(Uuid, Uuid, i32), Swipe>>,
    matches: Mutex<HashMap<(Uuid, i32), MatchRecord>>,
    exposures: Mutex<HashMap<i32, Exposure>>,
    taste: Mutex<HashMap<(Uuid, String), TasteSignal>>,
    chemistry: Mutex<HashMap<(Uuid, Uuid, String), Chemistry>>,
    stats: Mutex<HashMap<Uuid, SessionStats>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ── Seeding helpers ──────────────────────────────────────────────────

    pub fn add_genre(&self, genre: Genre) {
        self.genres.lock().unwrap().insert(genre.id, genre);
    }

    pub fn add_movie(&self, movie: Movie, genre_ids: &[i32]) {
        self.movie_genres
            .lock()
            .unwrap()
            .insert(movie.id, genre_ids.to_vec());
        self.movies.lock().unwrap().insert(movie.id, movie);
    }

    pub fn add_relation(&self, relation: TagRelation) {
        self.relations.lock().unwrap().push(relation);
    }

    // ── Inspection helpers ───────────────────────────────────────────────

    pub fn session(&self, id: Uuid) -> Option<Session> {
        self.sessions.lock().unwrap().get(&id).cloned()
    }

    pub fn match_count(&self, session_id: Uuid) -> usize {
        self.matches
            .lock()
            .unwrap()
            .keys()
            .filter(|(sid, _)| *sid == session_id)
            .count()
    }

    pub fn exposure(&self, movie_id: i32) -> Option<Exposure> {
        self.exposures.lock().unwrap().get(&movie_id).cloned()
    }

    pub fn stats(&self, session_id: Uuid) -> Option<SessionStats> {
        self.stats.lock().unwrap().get(&session_id).cloned()
    }
}

impl SessionRepository for InMemoryStore {
    async fn create(&self, session: &Session) -> Result<bool, SessionsServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.values().any(|s| s.code == session.code) {
            return Ok(false);
        }
        sessions.insert(session.id, session.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, SessionsServiceError> {
        Ok(self.sessions.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Session>, SessionsServiceError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.code == code)
            .cloned())
    }

    async fn list_for_participant(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Session>, SessionsServiceError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.is_participant(user_id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn assign_guest(&self, id: Uuid, guest_id: Uuid) -> Result<bool, SessionsServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&id) {
            Some(session) if session.guest_id.is_none() => {
                session.guest_id = Some(guest_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_genre(&self, id: Uuid, genre_id: i32) -> Result<(), SessionsServiceError> {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&id) {
            session.genre_id = genre_id;
        }
        Ok(())
    }

    async fn set_preferences(
        &self,
        id: Uuid,
        role: ParticipantRole,
        prefs: &PreferenceBundle,
    ) -> Result<(), SessionsServiceError> {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&id) {
            match role {
                ParticipantRole::Host => session.host_prefs = Some(prefs.clone()),
                ParticipantRole::Guest => session.guest_prefs = Some(prefs.clone()),
            }
        }
        Ok(())
    }

    async fn end(&self, id: Uuid, ended_at: DateTime<Utc>) -> Result<bool, SessionsServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&id) {
            Some(session) if session.ended_at.is_none() => {
                session.ended_at = Some(ended_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl CatalogRepository for InMemoryStore {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, SessionsServiceError> {
        Ok(self.genres.lock().unwrap().get(&id).cloned())
    }

    async fn list_genres(&self, industry: &str) -> Result<Vec<Genre>, SessionsServiceError> {
        let mut genres: Vec<Genre> = self
            .genres
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.industry == industry)
            .cloned()
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, SessionsServiceError> {
        Ok(self.movies.lock().unwrap().get(&id).cloned())
    }

    async fn find_movies(&self, ids: &[i32]) -> Result<Vec<Movie>, SessionsServiceError> {
        let movies = self.movies.lock().unwrap();
        Ok(ids.iter().filter_map(|id| movies.get(id).cloned()).collect())
    }

    async fn list_candidates(
        &self,
        genre_id: i32,
        industry: Option<&str>,
        exclude_movie_ids: &[i32],
        limit: u64,
    ) -> Result<Vec<Movie>, SessionsServiceError> {
        if let Some(industry) = industry {
            let genres = self.genres.lock().unwrap();
            let matches_industry = genres
                .get(&genre_id)
                .is_some_and(|g| g.industry == industry);
            if !matches_industry {
                return Ok(vec![]);
            }
        }
        let movie_genres = self.movie_genres.lock().unwrap();
        let movies = self.movies.lock().unwrap();
        let mut candidates: Vec<Movie> = movies
            .values()
            .filter(|m| {
                movie_genres
                    .get(&m.id)
                    .is_some_and(|gs| gs.contains(&genre_id))
            })
            .filter(|m| !exclude_movie_ids.contains(&m.id))
            .cloned()
            .collect();
        candidates.sort_by_key(|m| m.id);
        candidates.truncate(limit as usize);
        Ok(candidates)
    }

    async fn outgoing_relations(
        &self,
        from_tags: &[String],
    ) -> Result<Vec<TagRelation>, SessionsServiceError> {
        Ok(self
            .relations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| from_tags.contains(&r.from_tag))
            .cloned()
            .collect())
    }
}

impl SwipeRepository for InMemoryStore {
    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<bool, SessionsServiceError> {
        let mut swipes = self.swipes.lock().unwrap();
        let key = (swipe.user_id, swipe.session_id, swipe.movie_id);
        if swipes.contains_key(&key) {
            return Ok(false);
        }
        swipes.insert(key, swipe.clone());
        Ok(true)
    }

    async fn find(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Option<Swipe>, SessionsServiceError> {
        Ok(self
            .swipes
            .lock()
            .unwrap()
            .get(&(user_id, session_id, movie_id))
            .cloned())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<bool, SessionsServiceError> {
        Ok(self
            .swipes
            .lock()
            .unwrap()
            .remove(&(user_id, session_id, movie_id))
            .is_some())
    }

    async fn swiped_movie_ids(&self, session_id: Uuid) -> Result<Vec<i32>, SessionsServiceError> {
        let mut ids: Vec<i32> = self
            .swipes
            .lock()
            .unwrap()
            .keys()
            .filter(|(_, sid, _)| *sid == session_id)
            .map(|(_, _, movie_id)| *movie_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn likers(
        &self,
        session_id: Uuid,
        movie_id: i32,
    ) -> Result<Vec<Uuid>, SessionsServiceError> {
        Ok(self
            .swipes
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.session_id == session_id && s.movie_id == movie_id && s.reaction.is_like()
            })
            .map(|s| s.user_id)
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Swipe>, SessionsServiceError> {
        let page = page.clamped();
        let mut swipes: Vec<Swipe> = self
            .swipes
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .filter(|s| session_id.is_none_or(|sid| s.session_id == sid))
            .cloned()
            .collect();
        swipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(swipes
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

impl MatchRepository for InMemoryStore {
    async fn insert_if_absent(&self, record: &MatchRecord) -> Result<bool, SessionsServiceError> {
        let mut matches = self.matches.lock().unwrap();
        let key = (record.session_id, record.movie_id);
        if matches.contains_key(&key) {
            return Ok(false);
        }
        matches.insert(key, record.clone());
        Ok(true)
    }

    async fn exists(&self, session_id: Uuid, movie_id: i32) -> Result<bool, SessionsServiceError> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .contains_key(&(session_id, movie_id)))
    }

    async fn matched_movie_ids(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<i32>, SessionsServiceError> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .keys()
            .filter(|(sid, _)| *sid == session_id)
            .map(|(_, movie_id)| *movie_id)
            .collect())
    }

    async fn list_for_sessions(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<MatchRecord>, SessionsServiceError> {
        let mut records: Vec<MatchRecord> = self
            .matches
            .lock()
            .unwrap()
            .values()
            .filter(|r| session_ids.contains(&r.session_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

impl ExposureRepository for InMemoryStore {
    async fn get_many(&self, movie_ids: &[i32]) -> Result<Vec<Exposure>, SessionsServiceError> {
        let exposures = self.exposures.lock().unwrap();
        Ok(movie_ids
            .iter()
            .filter_map(|id| exposures.get(id).cloned())
            .collect())
    }

    async fn bump(&self, movie_id: i32, now: DateTime<Utc>) -> Result<(), SessionsServiceError> {
        let mut exposures = self.exposures.lock().unwrap();
        let entry = exposures.entry(movie_id).or_insert(Exposure {
            movie_id,
            exposed_count: 0,
            last_exposed_at: None,
        });
        entry.exposed_count += 1;
        entry.last_exposed_at = Some(now);
        Ok(())
    }
}

impl TasteSignalRepository for InMemoryStore {
    async fn get_many(
        &self,
        user_id: Uuid,
        tags: &[String],
    ) -> Result<Vec<TasteSignal>, SessionsServiceError> {
        let taste = self.taste.lock().unwrap();
        Ok(tags
            .iter()
            .filter_map(|tag| taste.get(&(user_id, tag.clone())).cloned())
            .collect())
    }

    async fn bump(
        &self,
        user_id: Uuid,
        tag: &str,
        reaction: Reaction,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        let mut taste = self.taste.lock().unwrap();
        let entry = taste
            .entry((user_id, tag.to_owned()))
            .or_insert(TasteSignal {
                user_id,
                tag: tag.to_owned(),
                like_count: 0,
                dislike_count: 0,
                last_interacted_at: now,
            });
        if reaction.is_like() {
            entry.like_count += 1;
        } else {
            entry.dislike_count += 1;
        }
        entry.last_interacted_at = now;
        Ok(())
    }
}

impl ChemistryRepository for InMemoryStore {
    async fn get_for_pair(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<Chemistry>, SessionsServiceError> {
        Ok(self
            .chemistry
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_a == user_a && c.user_b == user_b)
            .cloned()
            .collect())
    }

    async fn bump_swipe(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
    ) -> Result<(), SessionsServiceError> {
        let mut chemistry = self.chemistry.lock().unwrap();
        let entry = chemistry
            .entry((user_a, user_b, tag.to_owned()))
            .or_insert(Chemistry {
                user_a,
                user_b,
                tag: tag.to_owned(),
                swipe_count: 0,
                match_count: 0,
                last_matched_at: None,
            });
        entry.swipe_count += 1;
        Ok(())
    }

    async fn bump_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        tag: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionsServiceError> {
        let mut chemistry = self.chemistry.lock().unwrap();
        let entry = chemistry
            .entry((user_a, user_b, tag.to_owned()))
            .or_insert(Chemistry {
                user_a,
                user_b,
                tag: tag.to_owned(),
                swipe_count: 0,
                match_count: 0,
                last_matched_at: None,
            });
        entry.match_count += 1;
        entry.last_matched_at = Some(now);
        Ok(())
    }
}

impl StatsRepository for InMemoryStore {
    async fn get(&self, session_id: Uuid) -> Result<Option<SessionStats>, SessionsServiceError> {
        Ok(self.stats.lock().unwrap().get(&session_id).cloned())
    }

    async fn incr_swipes(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        let mut stats = self.stats.lock().unwrap();
        stats
            .entry(session_id)
            .or_insert_with(|| SessionStats::empty(session_id))
            .total_swipes += 1;
        Ok(())
    }

    async fn incr_matches(&self, session_id: Uuid) -> Result<(), SessionsServiceError> {
        let mut stats = self.stats.lock().unwrap();
        stats
            .entry(session_id)
            .or_insert_with(|| SessionStats::empty(session_id))
            .total_matches += 1;
        Ok(())
    }

    async fn finalize(
        &self,
        session_id: Uuid,
        duration_ms: i64,
        ended_by: EndReason,
        quality_score: i32,
        highlights: &[String],
    ) -> Result<(), SessionsServiceError> {
        let mut stats = self.stats.lock().unwrap();
        let entry = stats
            .entry(session_id)
            .or_insert_with(|| SessionStats::empty(session_id));
        entry.duration_ms = Some(duration_ms);
        entry.ended_by = Some(ended_by);
        entry.quality_score = Some(quality_score);
        entry.highlights = highlights.to_vec();
        Ok(())
    }
}

/// Notifier that records everything it is asked to publish.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(Uuid, SessionEvent)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(Uuid, SessionEvent)> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, session_id: Uuid, event: SessionEvent) {
        self.events.lock().unwrap().push((session_id, event));
    }
}
