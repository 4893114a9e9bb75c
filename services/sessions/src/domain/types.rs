use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinematch_domain::reaction::Reaction;

/// How many seconds a participant has to undo a swipe.
pub const UNDO_WINDOW_SECS: i64 = 10;

/// Catalog genre reference. Read-only here.
#[derive(Debug, Clone)]
pub struct Genre {
    pub id: i32,
    pub tmdb_id: i32,
    pub name: String,
    pub industry: String,
}

/// Movie synced from the external catalog, with its free-form tags loaded.
/// Read-only here.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub language: String,
    pub tags: Vec<String>,
}

/// Per-participant preference bundle submitted before swiping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceBundle {
    #[serde(default)]
    pub mood: Vec<String>,
    #[serde(default)]
    pub pace: Vec<String>,
    #[serde(default)]
    pub vibe: Vec<String>,
    #[serde(default)]
    pub era: Vec<String>,
}

impl PreferenceBundle {
    pub fn is_empty(&self) -> bool {
        self.mood.is_empty() && self.pace.is_empty() && self.vibe.is_empty() && self.era.is_empty()
    }
}

/// A private two-participant swipe session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub code: String,
    pub host_id: Uuid,
    pub guest_id: Option<Uuid>,
    pub genre_id: i32,
    pub industry: Option<String>,
    pub host_prefs: Option<PreferenceBundle>,
    pub guest_prefs: Option<PreferenceBundle>,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.host_id == user_id || self.guest_id == Some(user_id)
    }

    /// Both participants, once the guest has joined.
    pub fn participants(&self) -> Option<(Uuid, Uuid)> {
        self.guest_id.map(|guest| (self.host_id, guest))
    }
}

/// One participant's reaction to one movie in one session.
#[derive(Debug, Clone)]
pub struct Swipe {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub movie_id: i32,
    pub reaction: Reaction,
    pub created_at: DateTime<Utc>,
}

/// Mutual like on a movie within a session.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub session_id: Uuid,
    pub movie_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Global show-count and recency for a movie.
#[derive(Debug, Clone)]
pub struct Exposure {
    pub movie_id: i32,
    pub exposed_count: i64,
    pub last_exposed_at: Option<DateTime<Utc>>,
}

/// Per-(user, tag) like/dislike counters.
#[derive(Debug, Clone)]
pub struct TasteSignal {
    pub user_id: Uuid,
    pub tag: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub last_interacted_at: DateTime<Utc>,
}

/// Per-(normalized pair, tag) swipe/match counters.
#[derive(Debug, Clone)]
pub struct Chemistry {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub tag: String,
    pub swipe_count: i64,
    pub match_count: i64,
    pub last_matched_at: Option<DateTime<Utc>>,
}

/// Weighted directed tag edge for one-hop chemistry propagation.
#[derive(Debug, Clone)]
pub struct TagRelation {
    pub from_tag: String,
    pub to_tag: String,
    pub weight: f32,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    User,
    NoMoreMovies,
    Disconnect,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::NoMoreMovies => "no_more_movies",
            Self::Disconnect => "disconnect",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "no_more_movies" => Some(Self::NoMoreMovies),
            "disconnect" => Some(Self::Disconnect),
            _ => None,
        }
    }
}

/// Rolling per-session counters.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub session_id: Uuid,
    pub total_swipes: i64,
    pub total_matches: i64,
    pub duration_ms: Option<i64>,
    pub ended_by: Option<EndReason>,
    pub quality_score: Option<i32>,
    pub highlights: Vec<String>,
}

impl SessionStats {
    pub fn empty(session_id: Uuid) -> Self {
        Self {
            session_id,
            total_swipes: 0,
            total_matches: 0,
            duration_ms: None,
            ended_by: None,
            quality_score: None,
            highlights: Vec::new(),
        }
    }
}

/// Order a user pair consistently (lower id first) so both participants map
/// to the same chemistry records regardless of role.
pub fn normalize_pair(user_1: Uuid, user_2: Uuid) -> (Uuid, Uuid) {
    if user_1 < user_2 {
        (user_1, user_2)
    } else {
        (user_2, user_1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_normalize_pair_to_lower_id_first() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        assert_eq!(normalize_pair(a, b), (a, b));
        assert_eq!(normalize_pair(b, a), (a, b));
    }

    #[test]
    fn should_report_participants_only_when_guest_joined() {
        let host = Uuid::new_v4();
        let mut session = Session {
            id: Uuid::new_v4(),
            code: "ABC123".into(),
            host_id: host,
            guest_id: None,
            genre_id: 1,
            industry: None,
            host_prefs: None,
            guest_prefs: None,
            created_at: Utc::now(),
            ended_at: None,
        };
        assert!(session.participants().is_none());
        assert!(session.is_participant(host));

        let guest = Uuid::new_v4();
        session.guest_id = Some(guest);
        assert_eq!(session.participants(), Some((host, guest)));
        assert!(session.is_participant(guest));
        assert!(!session.is_participant(Uuid::new_v4()));
    }

    #[test]
    fn should_deserialize_partial_preference_bundle() {
        let bundle: PreferenceBundle =
            serde_json::from_str(r#"{"mood": ["cozy"], "era": ["90s"]}"#).unwrap();
        assert_eq!(bundle.mood, vec!["cozy"]);
        assert!(bundle.pace.is_empty());
        assert!(!bundle.is_empty());
        assert!(PreferenceBundle::default().is_empty());
    }
}
