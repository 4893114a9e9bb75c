//! Swipe ingestion, undo, and race-safe match detection.

use chrono::Utc;
use uuid::Uuid;

use cinematch_domain::reaction::Reaction;

use crate::domain::repository::{
    CatalogRepository, ChemistryRepository, MatchRepository, SessionRepository, StatsRepository,
    SwipeRepository, TasteSignalRepository,
};
use crate::domain::types::{
    MatchRecord, Movie, Session, Swipe, UNDO_WINDOW_SECS, normalize_pair,
};
use crate::error::SessionsServiceError;
use crate::realtime::{Notifier, SessionEvent};

/// Attempts per secondary write before giving up with a warning.
const SECONDARY_WRITE_ATTEMPTS: usize = 2;

/// Run a secondary write with one retry. Failures are logged and swallowed:
/// affinity counters, stats, and notifications must never fail a swipe that
/// is already durably recorded.
async fn best_effort<F, Fut>(what: &str, mut op: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), SessionsServiceError>>,
{
    for attempt in 1..=SECONDARY_WRITE_ATTEMPTS {
        match op().await {
            Ok(()) => return,
            Err(e) if attempt == SECONDARY_WRITE_ATTEMPTS => {
                tracing::warn!(error = %e, what, "secondary write failed, giving up");
            }
            Err(_) => {}
        }
    }
}

#[derive(Debug)]
pub struct RecordSwipeOutput {
    /// `true` when a mutual like exists on this movie after the swipe,
    /// whether this swipe completed it or a concurrent one did.
    pub matched: bool,
}

pub struct RecordSwipeUseCase<S, C, W, M, T, P, ST, N>
where
    S: SessionRepository,
    C: CatalogRepository,
    W: SwipeRepository,
    M: MatchRepository,
    T: TasteSignalRepository,
    P: ChemistryRepository,
    ST: StatsRepository,
    N: Notifier,
{
    pub sessions: S,
    pub catalog: C,
    pub swipes: W,
    pub matches: M,
    pub taste: T,
    pub chemistry: P,
    pub stats: ST,
    pub notifier: N,
}

impl<S, C, W, M, T, P, ST, N> RecordSwipeUseCase<S, C, W, M, T, P, ST, N>
where
    S: SessionRepository,
    C: CatalogRepository,
    W: SwipeRepository,
    M: MatchRepository,
    T: TasteSignalRepository,
    P: ChemistryRepository,
    ST: StatsRepository,
    N: Notifier,
{
    pub async fn execute(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        movie_id: i32,
        reaction: Reaction,
    ) -> Result<RecordSwipeOutput, SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        // Precondition order matters: an ended session reports ended even to
        // an outsider probing it, and readiness is checked before membership
        // so a host swiping alone learns the real reason.
        if !session.is_active() {
            return Err(SessionsServiceError::SessionEnded);
        }
        if session.guest_id.is_none() {
            return Err(SessionsServiceError::SessionNotReady);
        }
        if !session.is_participant(user_id) {
            return Err(SessionsServiceError::NotParticipant);
        }

        let movie = self
            .catalog
            .find_movie(movie_id)
            .await?
            .ok_or(SessionsServiceError::MovieNotFound)?;

        if self.matches.exists(session_id, movie_id).await? {
            return Err(SessionsServiceError::AlreadyMatched);
        }

        let swipe = Swipe {
            user_id,
            session_id,
            movie_id,
            reaction,
            created_at: Utc::now(),
        };
        if !self.swipes.insert_if_absent(&swipe).await? {
            return Err(SessionsServiceError::DuplicateSwipe);
        }

        // The swipe is durable. Everything below is best-effort.
        self.record_affinity(&session, &movie, user_id, reaction)
            .await;
        self.notifier
            .publish(session_id, SessionEvent::SwipeHappened { user_id });

        let matched = match reaction {
            Reaction::Like => self.detect_match(&session, &movie).await?,
            Reaction::Dislike => false,
        };

        Ok(RecordSwipeOutput { matched })
    }

    async fn record_affinity(
        &self,
        session: &Session,
        movie: &Movie,
        user_id: Uuid,
        reaction: Reaction,
    ) {
        let now = Utc::now();
        best_effort("stats.incr_swipes", || {
            self.stats.incr_swipes(session.id)
        })
        .await;

        for tag in &movie.tags {
            best_effort("taste.bump", || self.taste.bump(user_id, tag, reaction, now)).await;
        }
        if let Some((host, guest)) = session.participants() {
            let (user_a, user_b) = normalize_pair(host, guest);
            for tag in &movie.tags {
                best_effort("chemistry.bump_swipe", || {
                    self.chemistry.bump_swipe(user_a, user_b, tag)
                })
                .await;
            }
        }
    }

    /// After a like lands, check whether both participants have now liked the
    /// movie, and if so create the match. The unique key on (session, movie)
    /// makes exactly one concurrent writer the creator; everyone else just
    /// observes the match.
    async fn detect_match(
        &self,
        session: &Session,
        movie: &Movie,
    ) -> Result<bool, SessionsServiceError> {
        let Some((host, guest)) = session.participants() else {
            return Ok(false);
        };

        let likers = self.swipes.likers(session.id, movie.id).await?;
        if !(likers.contains(&host) && likers.contains(&guest)) {
            return Ok(false);
        }

        let record = MatchRecord {
            session_id: session.id,
            movie_id: movie.id,
            created_at: Utc::now(),
        };
        let created = self.matches.insert_if_absent(&record).await?;
        if created {
            let now = Utc::now();
            best_effort("stats.incr_matches", || {
                self.stats.incr_matches(session.id)
            })
            .await;
            let (user_a, user_b) = normalize_pair(host, guest);
            for tag in &movie.tags {
                best_effort("chemistry.bump_match", || {
                    self.chemistry.bump_match(user_a, user_b, tag, now)
                })
                .await;
            }
            self.notifier.publish(
                session.id,
                SessionEvent::Match {
                    session_id: session.id,
                    movie_id: movie.id,
                    title: movie.title.clone(),
                },
            );
        }

        Ok(true)
    }
}

// ── UndoSwipe ────────────────────────────────────────────────────────────────

pub struct UndoSwipeUseCase<S, W, M>
where
    S: SessionRepository,
    W: SwipeRepository,
    M: MatchRepository,
{
    pub sessions: S,
    pub swipes: W,
    pub matches: M,
}

impl<S, W, M> UndoSwipeUseCase<S, W, M>
where
    S: SessionRepository,
    W: SwipeRepository,
    M: MatchRepository,
{
    /// Remove a recent swipe. Matches are never unwound, and neither are the
    /// taste or chemistry counters: the intent was expressed, undo only
    /// removes it from the session's ledger.
    pub async fn execute(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        movie_id: i32,
    ) -> Result<(), SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        if !session.is_active() {
            return Err(SessionsServiceError::SessionEnded);
        }
        if !session.is_participant(user_id) {
            return Err(SessionsServiceError::NotParticipant);
        }

        let swipe = self
            .swipes
            .find(user_id, session_id, movie_id)
            .await?
            .ok_or(SessionsServiceError::SwipeNotFound)?;

        if self.matches.exists(session_id, movie_id).await? {
            return Err(SessionsServiceError::UndoAfterMatch);
        }
        let age = Utc::now() - swipe.created_at;
        if age.num_seconds() >= UNDO_WINDOW_SECS {
            return Err(SessionsServiceError::UndoWindowExpired);
        }

        // Losing the delete race means someone else already undid it.
        if !self.swipes.delete(user_id, session_id, movie_id).await? {
            return Err(SessionsServiceError::SwipeNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use cinematch_domain::pagination::PageRequest;

    use crate::domain::repository::ParticipantRole;
    use crate::domain::types::{Genre, PreferenceBundle, SessionStats, TagRelation, TasteSignal};

    fn ready_session() -> Session {
        Session {
            id: Uuid::new_v4(),
            code: "AB12CD".into(),
            host_id: Uuid::new_v4(),
            guest_id: Some(Uuid::new_v4()),
            genre_id: 1,
            industry: None,
            host_prefs: None,
            guest_prefs: None,
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    fn movie_fixture(id: i32, tags: &[&str]) -> Movie {
        Movie {
            id,
            tmdb_id: id * 10,
            title: format!("Movie {id}"),
            overview: String::new(),
            release_date: None,
            rating: Some(7.5),
            language: "en".into(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct MockSessions {
        session: Option<Session>,
    }

    impl SessionRepository for MockSessions {
        async fn create(&self, _session: &Session) -> Result<bool, SessionsServiceError> {
            Ok(true)
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Session>, SessionsServiceError> {
            Ok(self.session.clone())
        }
        async fn find_by_code(
            &self,
            _code: &str,
        ) -> Result<Option<Session>, SessionsServiceError> {
            Ok(self.session.clone())
        }
        async fn list_for_participant(
            &self,
            _user_id: Uuid,
        ) -> Result<Vec<Session>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn assign_guest(
            &self,
            _id: Uuid,
            _guest_id: Uuid,
        ) -> Result<bool, SessionsServiceError> {
            Ok(true)
        }
        async fn set_genre(&self, _id: Uuid, _genre_id: i32) -> Result<(), SessionsServiceError> {
            Ok(())
        }
        async fn set_preferences(
            &self,
            _id: Uuid,
            _role: ParticipantRole,
            _prefs: &PreferenceBundle,
        ) -> Result<(), SessionsServiceError> {
            Ok(())
        }
        async fn end(
            &self,
            _id: Uuid,
            _ended_at: DateTime<Utc>,
        ) -> Result<bool, SessionsServiceError> {
            Ok(true)
        }
    }

    struct MockCatalog {
        movie: Option<Movie>,
    }

    impl CatalogRepository for MockCatalog {
        async fn find_genre(&self, _id: i32) -> Result<Option<Genre>, SessionsServiceError> {
            Ok(None)
        }
        async fn list_genres(
            &self,
            _industry: &str,
        ) -> Result<Vec<Genre>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn find_movie(&self, _id: i32) -> Result<Option<Movie>, SessionsServiceError> {
            Ok(self.movie.clone())
        }
        async fn find_movies(&self, _ids: &[i32]) -> Result<Vec<Movie>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn list_candidates(
            &self,
            _genre_id: i32,
            _industry: Option<&str>,
            _exclude_movie_ids: &[i32],
            _limit: u64,
        ) -> Result<Vec<Movie>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn outgoing_relations(
            &self,
            _from_tags: &[String],
        ) -> Result<Vec<TagRelation>, SessionsServiceError> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct MockSwipes {
        insert_returns: bool,
        delete_returns: bool,
        existing: Option<Swipe>,
        likers: Vec<Uuid>,
        inserted: Mutex<Vec<(Uuid, i32)>>,
    }

    impl SwipeRepository for MockSwipes {
        async fn insert_if_absent(&self, swipe: &Swipe) -> Result<bool, SessionsServiceError> {
            self.inserted
                .lock()
                .unwrap()
                .push((swipe.user_id, swipe.movie_id));
            Ok(self.insert_returns)
        }
        async fn find(
            &self,
            _user_id: Uuid,
            _session_id: Uuid,
            _movie_id: i32,
        ) -> Result<Option<Swipe>, SessionsServiceError> {
            Ok(self.existing.clone())
        }
        async fn delete(
            &self,
            _user_id: Uuid,
            _session_id: Uuid,
            _movie_id: i32,
        ) -> Result<bool, SessionsServiceError> {
            Ok(self.delete_returns)
        }
        async fn swiped_movie_ids(
            &self,
            _session_id: Uuid,
        ) -> Result<Vec<i32>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn likers(
            &self,
            _session_id: Uuid,
            _movie_id: i32,
        ) -> Result<Vec<Uuid>, SessionsServiceError> {
            Ok(self.likers.clone())
        }
        async fn list_for_user(
            &self,
            _user_id: Uuid,
            _session_id: Option<Uuid>,
            _page: PageRequest,
        ) -> Result<Vec<Swipe>, SessionsServiceError> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct MockMatches {
        exists_returns: bool,
        insert_returns: bool,
        inserted: Mutex<Vec<i32>>,
    }

    impl MatchRepository for MockMatches {
        async fn insert_if_absent(
            &self,
            record: &MatchRecord,
        ) -> Result<bool, SessionsServiceError> {
            self.inserted.lock().unwrap().push(record.movie_id);
            Ok(self.insert_returns)
        }
        async fn exists(
            &self,
            _session_id: Uuid,
            _movie_id: i32,
        ) -> Result<bool, SessionsServiceError> {
            Ok(self.exists_returns)
        }
        async fn matched_movie_ids(
            &self,
            _session_id: Uuid,
        ) -> Result<Vec<i32>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn list_for_sessions(
            &self,
            _session_ids: &[Uuid],
        ) -> Result<Vec<MatchRecord>, SessionsServiceError> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct MockTaste {
        bumps: Mutex<Vec<(String, Reaction)>>,
    }

    impl TasteSignalRepository for MockTaste {
        async fn get_many(
            &self,
            _user_id: Uuid,
            _tags: &[String],
        ) -> Result<Vec<TasteSignal>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn bump(
            &self,
            _user_id: Uuid,
            tag: &str,
            reaction: Reaction,
            _now: DateTime<Utc>,
        ) -> Result<(), SessionsServiceError> {
            self.bumps.lock().unwrap().push((tag.to_owned(), reaction));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockChemistry {
        swipe_bumps: Mutex<Vec<String>>,
        match_bumps: Mutex<Vec<String>>,
    }

    impl ChemistryRepository for MockChemistry {
        async fn get_for_pair(
            &self,
            _user_a: Uuid,
            _user_b: Uuid,
        ) -> Result<Vec<crate::domain::types::Chemistry>, SessionsServiceError> {
            Ok(vec![])
        }
        async fn bump_swipe(
            &self,
            _user_a: Uuid,
            _user_b: Uuid,
            tag: &str,
        ) -> Result<(), SessionsServiceError> {
            self.swipe_bumps.lock().unwrap().push(tag.to_owned());
            Ok(())
        }
        async fn bump_match(
            &self,
            _user_a: Uuid,
            _user_b: Uuid,
            tag: &str,
            _now: DateTime<Utc>,
        ) -> Result<(), SessionsServiceError> {
            self.match_bumps.lock().unwrap().push(tag.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockStats {
        swipe_incrs: Mutex<u32>,
        match_incrs: Mutex<u32>,
    }

    impl StatsRepository for MockStats {
        async fn get(
            &self,
            _session_id: Uuid,
        ) -> Result<Option<SessionStats>, SessionsServiceError> {
            Ok(None)
        }
        async fn incr_swipes(&self, _session_id: Uuid) -> Result<(), SessionsServiceError> {
            *self.swipe_incrs.lock().unwrap() += 1;
            Ok(())
        }
        async fn incr_matches(&self, _session_id: Uuid) -> Result<(), SessionsServiceError> {
            *self.match_incrs.lock().unwrap() += 1;
            Ok(())
        }
        async fn finalize(
            &self,
            _session_id: Uuid,
            _duration_ms: i64,
            _ended_by: crate::domain::types::EndReason,
            _quality_score: i32,
            _highlights: &[String],
        ) -> Result<(), SessionsServiceError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl Notifier for RecordingNotifier {
        fn publish(&self, _session_id: Uuid, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[allow(clippy::type_complexity)]
    fn usecase(
        session: Session,
        movie: Option<Movie>,
        swipes: MockSwipes,
        matches: MockMatches,
    ) -> RecordSwipeUseCase<
        MockSessions,
        MockCatalog,
        MockSwipes,
        MockMatches,
        MockTaste,
        MockChemistry,
        MockStats,
        RecordingNotifier,
    > {
        RecordSwipeUseCase {
            sessions: MockSessions {
                session: Some(session),
            },
            catalog: MockCatalog { movie },
            swipes,
            matches,
            taste: MockTaste::default(),
            chemistry: MockChemistry::default(),
            stats: MockStats::default(),
            notifier: RecordingNotifier::default(),
        }
    }

    #[tokio::test]
    async fn should_record_like_and_bump_affinity() {
        let session = ready_session();
        let session_id = session.id;
        let user = session.host_id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &["heist", "neo-noir"])),
            MockSwipes {
                insert_returns: true,
                likers: vec![user],
                ..Default::default()
            },
            MockMatches::default(),
        );

        let out = uc.execute(session_id, user, 5, Reaction::Like).await.unwrap();
        assert!(!out.matched);

        assert_eq!(*uc.stats.swipe_incrs.lock().unwrap(), 1);
        let taste = uc.taste.bumps.lock().unwrap();
        assert_eq!(taste.len(), 2);
        assert!(taste.iter().all(|(_, r)| *r == Reaction::Like));
        assert_eq!(uc.chemistry.swipe_bumps.lock().unwrap().len(), 2);
        let events = uc.notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::SwipeHappened { .. }));
    }

    #[tokio::test]
    async fn should_create_match_when_both_liked() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let guest = session.guest_id.unwrap();
        let uc = usecase(
            session,
            Some(movie_fixture(5, &["heist"])),
            MockSwipes {
                insert_returns: true,
                likers: vec![host, guest],
                ..Default::default()
            },
            MockMatches {
                insert_returns: true,
                ..Default::default()
            },
        );

        let out = uc.execute(session_id, guest, 5, Reaction::Like).await.unwrap();
        assert!(out.matched);
        assert_eq!(*uc.stats.match_incrs.lock().unwrap(), 1);
        assert_eq!(
            uc.chemistry.match_bumps.lock().unwrap().as_slice(),
            ["heist"]
        );
        let events = uc.notifier.events.lock().unwrap();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::Match { movie_id: 5, .. }))
        );
    }

    #[tokio::test]
    async fn race_loser_reports_match_without_side_effects() {
        // Both likes are in, but a concurrent request created the match row
        // first: insert_if_absent returns false.
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let guest = session.guest_id.unwrap();
        let uc = usecase(
            session,
            Some(movie_fixture(5, &["heist"])),
            MockSwipes {
                insert_returns: true,
                likers: vec![host, guest],
                ..Default::default()
            },
            MockMatches {
                insert_returns: false,
                ..Default::default()
            },
        );

        let out = uc.execute(session_id, host, 5, Reaction::Like).await.unwrap();
        assert!(out.matched);
        assert_eq!(*uc.stats.match_incrs.lock().unwrap(), 0);
        assert!(uc.chemistry.match_bumps.lock().unwrap().is_empty());
        assert!(
            !uc.notifier
                .events
                .lock()
                .unwrap()
                .iter()
                .any(|e| matches!(e, SessionEvent::Match { .. }))
        );
    }

    #[tokio::test]
    async fn dislike_never_matches() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let guest = session.guest_id.unwrap();
        let uc = usecase(
            session,
            Some(movie_fixture(5, &["heist"])),
            MockSwipes {
                insert_returns: true,
                likers: vec![host, guest],
                ..Default::default()
            },
            MockMatches {
                insert_returns: true,
                ..Default::default()
            },
        );

        let out = uc
            .execute(session_id, host, 5, Reaction::Dislike)
            .await
            .unwrap();
        assert!(!out.matched);
        assert!(uc.matches.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_duplicate_swipe() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &[])),
            MockSwipes::default(),
            MockMatches::default(),
        );
        let result = uc.execute(session_id, host, 5, Reaction::Like).await;
        assert!(matches!(result, Err(SessionsServiceError::DuplicateSwipe)));
        assert_eq!(*uc.stats.swipe_incrs.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn should_reject_swipe_on_matched_movie() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &[])),
            MockSwipes {
                insert_returns: true,
                ..Default::default()
            },
            MockMatches {
                exists_returns: true,
                ..Default::default()
            },
        );
        let result = uc.execute(session_id, host, 5, Reaction::Like).await;
        assert!(matches!(result, Err(SessionsServiceError::AlreadyMatched)));
        assert!(uc.swipes.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_check_preconditions_in_order() {
        // Ended wins over not-ready and membership.
        let mut session = ready_session();
        session.guest_id = None;
        session.ended_at = Some(Utc::now());
        let session_id = session.id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &[])),
            MockSwipes::default(),
            MockMatches::default(),
        );
        let result = uc
            .execute(session_id, Uuid::new_v4(), 5, Reaction::Like)
            .await;
        assert!(matches!(result, Err(SessionsServiceError::SessionEnded)));

        // Not-ready wins over membership.
        let mut session = ready_session();
        session.guest_id = None;
        let session_id = session.id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &[])),
            MockSwipes::default(),
            MockMatches::default(),
        );
        let result = uc
            .execute(session_id, Uuid::new_v4(), 5, Reaction::Like)
            .await;
        assert!(matches!(result, Err(SessionsServiceError::SessionNotReady)));

        // Outsider against a ready session.
        let session = ready_session();
        let session_id = session.id;
        let uc = usecase(
            session,
            Some(movie_fixture(5, &[])),
            MockSwipes::default(),
            MockMatches::default(),
        );
        let result = uc
            .execute(session_id, Uuid::new_v4(), 5, Reaction::Like)
            .await;
        assert!(matches!(result, Err(SessionsServiceError::NotParticipant)));
    }

    #[tokio::test]
    async fn should_reject_swipe_on_unknown_movie() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = usecase(session, None, MockSwipes::default(), MockMatches::default());
        let result = uc.execute(session_id, host, 5, Reaction::Like).await;
        assert!(matches!(result, Err(SessionsServiceError::MovieNotFound)));
    }

    fn undo_usecase(
        session: Session,
        swipes: MockSwipes,
        matches: MockMatches,
    ) -> UndoSwipeUseCase<MockSessions, MockSwipes, MockMatches> {
        UndoSwipeUseCase {
            sessions: MockSessions {
                session: Some(session),
            },
            swipes,
            matches,
        }
    }

    fn swipe_fixture(user: Uuid, session: Uuid, age_secs: i64) -> Swipe {
        Swipe {
            user_id: user,
            session_id: session,
            movie_id: 5,
            reaction: Reaction::Like,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn should_undo_fresh_swipe() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = undo_usecase(
            session,
            MockSwipes {
                existing: Some(swipe_fixture(host, session_id, 2)),
                delete_returns: true,
                ..Default::default()
            },
            MockMatches::default(),
        );
        assert!(uc.execute(session_id, host, 5).await.is_ok());
    }

    #[tokio::test]
    async fn should_reject_undo_after_window() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = undo_usecase(
            session,
            MockSwipes {
                existing: Some(swipe_fixture(host, session_id, UNDO_WINDOW_SECS + 1)),
                delete_returns: true,
                ..Default::default()
            },
            MockMatches::default(),
        );
        let result = uc.execute(session_id, host, 5).await;
        assert!(matches!(
            result,
            Err(SessionsServiceError::UndoWindowExpired)
        ));
    }

    #[tokio::test]
    async fn should_reject_undo_of_matched_swipe() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = undo_usecase(
            session,
            MockSwipes {
                existing: Some(swipe_fixture(host, session_id, 1)),
                delete_returns: true,
                ..Default::default()
            },
            MockMatches {
                exists_returns: true,
                ..Default::default()
            },
        );
        let result = uc.execute(session_id, host, 5).await;
        assert!(matches!(result, Err(SessionsServiceError::UndoAfterMatch)));
    }

    #[tokio::test]
    async fn should_reject_undo_of_missing_swipe() {
        let session = ready_session();
        let session_id = session.id;
        let host = session.host_id;
        let uc = undo_usecase(session, MockSwipes::default(), MockMatches::default());
        let result = uc.execute(session_id, host, 5).await;
        assert!(matches!(result, Err(SessionsServiceError::SwipeNotFound)));
    }

    #[tokio::test]
    async fn best_effort_swallows_persistent_failures() {
        let calls = Mutex::new(0u32);
        best_effort("test", || {
            *calls.lock().unwrap() += 1;
            async { Err(SessionsServiceError::Internal(anyhow::anyhow!("boom"))) }
        })
        .await;
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
