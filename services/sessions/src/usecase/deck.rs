//! Recommendation deck assembly.
//!
//! The deck is a penalty-ranked slice of the candidate pool: affinity signals
//! (taste, pair chemistry, shared preferences) lower a movie's penalty,
//! exposure raises it, and movies with equal penalty are shuffled so the deck
//! stays fresh between fetches.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Duration, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::domain::repository::{
    CatalogRepository, ChemistryRepository, ExposureRepository, MatchRepository,
    SessionRepository, StatsRepository, SwipeRepository, TasteSignalRepository,
};
use crate::domain::types::{Movie, PreferenceBundle, SessionStats, normalize_pair};
use crate::error::SessionsServiceError;
use crate::usecase::preference::merge_preferences;

/// A movie shown within this window picks up a staleness penalty.
const RECENT_EXPOSURE_COOLDOWN_MINUTES: i64 = 30;
/// Lifetime show count past which a movie is considered over-exposed.
const MAX_GLOBAL_EXPOSURE: i64 = 100;
/// Upper bound on candidates pulled from the catalog per deck build.
const CANDIDATE_POOL_SIZE: u64 = 120;

const FINAL_DECK_SIZE: usize = 40;
const MIN_DECK_SIZE: usize = 16;
const MAX_DECK_SIZE: usize = 50;
const STALLED_DECK_SIZE: usize = 10;

const TASTE_BONUS_CAP: i64 = 3;
const CHEMISTRY_BONUS_CAP: f64 = 5.0;
const PREFERENCE_BONUS_CAP: i64 = 4;

/// Deck size adapts to how the session is going: explore wide early, tighten
/// once the pair is matching, shrink hard when many swipes produced nothing.
pub fn adaptive_deck_size(total_swipes: i64, total_matches: i64) -> usize {
    if total_swipes < 10 {
        MAX_DECK_SIZE
    } else if total_matches >= 2 {
        MIN_DECK_SIZE
    } else if total_swipes > 25 && total_matches == 0 {
        STALLED_DECK_SIZE
    } else {
        FINAL_DECK_SIZE
    }
}

/// Decade bucket a release year falls into, comparable against the `era`
/// entries of a preference bundle.
pub fn era_bucket(year: i32) -> &'static str {
    match year {
        ..1970 => "classic",
        1970..1980 => "70s",
        1980..1990 => "80s",
        1990..2000 => "90s",
        2000..2010 => "2000s",
        2010..2020 => "2010s",
        _ => "2020s",
    }
}

/// How many of the merged preference terms this movie satisfies, capped.
/// Mood/pace/vibe terms match against title, overview, and tags
/// (case-insensitive substring); era terms match the release decade.
pub fn preference_bonus(movie: &Movie, target: &PreferenceBundle) -> i64 {
    let haystack = format!(
        "{} {} {}",
        movie.title.to_lowercase(),
        movie.overview.to_lowercase(),
        movie.tags.join(" ").to_lowercase(),
    );

    let mut bonus = 0;
    for term in target
        .mood
        .iter()
        .chain(target.pace.iter())
        .chain(target.vibe.iter())
    {
        if haystack.contains(&term.to_lowercase()) {
            bonus += 1;
        }
    }
    if let Some(date) = movie.release_date {
        let bucket = era_bucket(date.year());
        if target.era.iter().any(|e| e.eq_ignore_ascii_case(bucket)) {
            bonus += 1;
        }
    }
    bonus.min(PREFERENCE_BONUS_CAP)
}

/// Order scored movies by ascending penalty, shuffling within equal-penalty
/// groups so repeated fetches do not replay the identical order.
fn order_by_penalty(scored: Vec<(i64, Movie)>) -> Vec<Movie> {
    let mut grouped: BTreeMap<i64, Vec<Movie>> = BTreeMap::new();
    for (penalty, movie) in scored {
        grouped.entry(penalty).or_default().push(movie);
    }
    let mut rng = rand::rng();
    let mut ordered = Vec::new();
    for (_, mut group) in grouped {
        group.shuffle(&mut rng);
        ordered.append(&mut group);
    }
    ordered
}

#[derive(Debug)]
pub struct Deck {
    pub session_id: Uuid,
    pub genre: String,
    pub movies: Vec<Movie>,
}

pub struct BuildDeckUseCase<S, C, W, M, E, T, P, ST>
where
    S: SessionRepository,
    C: CatalogRepository,
    W: SwipeRepository,
    M: MatchRepository,
    E: ExposureRepository,
    T: TasteSignalRepository,
    P: ChemistryRepository,
    ST: StatsRepository,
{
    pub sessions: S,
    pub catalog: C,
    pub swipes: W,
    pub matches: M,
    pub exposures: E,
    pub taste: T,
    pub chemistry: P,
    pub stats: ST,
}

impl<S, C, W, M, E, T, P, ST> BuildDeckUseCase<S, C, W, M, E, T, P, ST>
where
    S: SessionRepository,
    C: CatalogRepository,
    W: SwipeRepository,
    M: MatchRepository,
    E: ExposureRepository,
    T: TasteSignalRepository,
    P: ChemistryRepository,
    ST: StatsRepository,
{
    pub async fn execute(
        &self,
        session_id: Uuid,
        requester: Uuid,
    ) -> Result<Deck, SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;
        if !session.is_active() {
            return Err(SessionsServiceError::SessionEnded);
        }
        if !session.is_participant(requester) {
            return Err(SessionsServiceError::NotParticipant);
        }
        let genre = self
            .catalog
            .find_genre(session.genre_id)
            .await?
            .ok_or(SessionsServiceError::GenreNotFound)?;

        let stats = self
            .stats
            .get(session_id)
            .await?
            .unwrap_or_else(|| SessionStats::empty(session_id));
        let deck_size = adaptive_deck_size(stats.total_swipes, stats.total_matches);

        // Anything either participant already acted on is out of the pool.
        let mut exclude: HashSet<i32> =
            self.swipes.swiped_movie_ids(session_id).await?.into_iter().collect();
        exclude.extend(self.matches.matched_movie_ids(session_id).await?);
        let exclude: Vec<i32> = exclude.into_iter().collect();

        let candidates = self
            .catalog
            .list_candidates(
                genre.id,
                session.industry.as_deref(),
                &exclude,
                CANDIDATE_POOL_SIZE,
            )
            .await?;
        if candidates.is_empty() {
            return Ok(Deck {
                session_id,
                genre: genre.name,
                movies: Vec::new(),
            });
        }

        let all_tags: Vec<String> = candidates
            .iter()
            .flat_map(|m| m.tags.iter().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let taste: HashMap<String, i64> = self
            .taste
            .get_many(requester, &all_tags)
            .await?
            .into_iter()
            .map(|s| (s.tag, s.like_count - s.dislike_count))
            .collect();

        let chemistry: HashMap<String, i64> = match session.participants() {
            Some((host, guest)) => {
                let (user_a, user_b) = normalize_pair(host, guest);
                self.chemistry
                    .get_for_pair(user_a, user_b)
                    .await?
                    .into_iter()
                    .map(|c| (c.tag, c.match_count))
                    .collect()
            }
            None => HashMap::new(),
        };
        let relations = self.catalog.outgoing_relations(&all_tags).await?;

        let movie_ids: Vec<i32> = candidates.iter().map(|m| m.id).collect();
        let exposures: HashMap<i32, _> = self
            .exposures
            .get_many(&movie_ids)
            .await?
            .into_iter()
            .map(|e| (e.movie_id, e))
            .collect();

        let target = merge_preferences(&session).filter(|t| !t.is_empty());

        let now = Utc::now();
        let cooldown = Duration::minutes(RECENT_EXPOSURE_COOLDOWN_MINUTES);
        let mut scored: Vec<(i64, i64, Movie)> = Vec::with_capacity(candidates.len());
        for movie in candidates {
            let mut penalty: i64 = 0;

            let taste_bonus: i64 = movie
                .tags
                .iter()
                .filter_map(|tag| taste.get(tag))
                .sum();
            penalty -= taste_bonus.min(TASTE_BONUS_CAP);

            // Direct pair chemistry on the movie's tags, plus a one-hop pull
            // through the tag-relation graph.
            let mut chemistry_bonus: f64 = 0.0;
            for tag in &movie.tags {
                if let Some(count) = chemistry.get(tag) {
                    chemistry_bonus += (*count as f64) * 2.0;
                }
                for rel in relations.iter().filter(|r| &r.from_tag == tag) {
                    if let Some(count) = chemistry.get(&rel.to_tag) {
                        chemistry_bonus += f64::from(rel.weight) * (*count as f64);
                    }
                }
            }
            penalty -= chemistry_bonus.min(CHEMISTRY_BONUS_CAP).round() as i64;

            let pref_bonus = match &target {
                Some(t) => preference_bonus(&movie, t),
                None => 0,
            };
            penalty -= pref_bonus;

            if let Some(exposure) = exposures.get(&movie.id) {
                let recently = exposure
                    .last_exposed_at
                    .is_some_and(|at| now - at < cooldown);
                if recently {
                    penalty += 2;
                }
                if exposure.exposed_count >= MAX_GLOBAL_EXPOSURE {
                    penalty += 3;
                }
            }

            scored.push((penalty, pref_bonus, movie));
        }

        // When both participants stated preferences, drop candidates matching
        // none of them, unless that would leave nothing to show.
        if target.is_some() && scored.iter().any(|(_, pref, _)| *pref > 0) {
            scored.retain(|(_, pref, _)| *pref > 0);
        }

        let mut movies = order_by_penalty(
            scored.into_iter().map(|(p, _, m)| (p, m)).collect(),
        );
        movies.truncate(deck_size);

        // Exposure accounting must never break the recommendation itself.
        for movie in &movies {
            if let Err(e) = self.exposures.bump(movie.id, now).await {
                tracing::warn!(error = %e, movie_id = movie.id, "exposure bump failed");
            }
        }

        Ok(Deck {
            session_id,
            genre: genre.name,
            movies,
        })
    }
}
