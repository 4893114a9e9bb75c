//! Session quality scoring and the stats read view.

use uuid::Uuid;

use crate::domain::repository::{SessionRepository, StatsRepository};
use crate::domain::types::SessionStats;
use crate::error::SessionsServiceError;

/// Participant-only read of a session's rolling (or finalized) stats.
pub struct GetSessionStatsUseCase<S: SessionRepository, ST: StatsRepository> {
    pub sessions: S,
    pub stats: ST,
}

impl<S: SessionRepository, ST: StatsRepository> GetSessionStatsUseCase<S, ST> {
    pub async fn execute(
        &self,
        session_id: Uuid,
        requester: Uuid,
    ) -> Result<SessionStats, SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;
        if !session.is_participant(requester) {
            return Err(SessionsServiceError::NotParticipant);
        }
        Ok(self
            .stats
            .get(session_id)
            .await?
            .unwrap_or_else(|| SessionStats::empty(session_id)))
    }
}

/// Outcome of scoring a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReport {
    pub score: i32,
    pub highlights: Vec<String>,
}

/// Score a finished session on a 0–100 scale.
///
/// score = clamp(efficiency + absolute_matches + depth − early_end, 0, 100):
/// - efficiency: min(matches × 100 / swipes, 40) when any swipes happened
/// - absolute matches: min(matches × 15, 30)
/// - depth: +10 when the session ran longer than five minutes
/// - early end: −15 when fewer than ten swipes happened
pub fn quality_report(total_swipes: i64, total_matches: i64, duration_ms: i64) -> QualityReport {
    let mut score: i64 = 0;
    let mut highlights = Vec::new();

    if total_swipes > 0 {
        score += (total_matches * 100 / total_swipes).min(40);

        let match_ratio = total_matches as f64 / total_swipes as f64;
        if match_ratio > 0.2 {
            highlights.push("strong-agreement".to_owned());
        } else if match_ratio < 0.05 {
            highlights.push("low-alignment".to_owned());
        }
    }

    score += (total_matches * 15).min(30);
    if total_matches >= 2 {
        highlights.push("multiple-matches".to_owned());
    }

    let duration_minutes = duration_ms as f64 / 60_000.0;
    if duration_minutes > 5.0 {
        score += 10;
        highlights.push("good-flow".to_owned());
    }

    if total_swipes < 10 {
        score -= 15;
        highlights.push("ended-too-early".to_owned());
    }

    QualityReport {
        score: score.clamp(0, 100) as i32,
        highlights,
    }
}
