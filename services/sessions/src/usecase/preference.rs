//! Participant preference bundles and how the two sides merge into one
//! target used by deck scoring.

use uuid::Uuid;

use crate::domain::repository::{ParticipantRole, SessionRepository};
use crate::domain::types::{PreferenceBundle, Session};
use crate::error::SessionsServiceError;

pub struct SetPreferencesUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> SetPreferencesUseCase<S> {
    pub async fn execute(
        &self,
        session_id: Uuid,
        requester: Uuid,
        prefs: PreferenceBundle,
    ) -> Result<(), SessionsServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionsServiceError::SessionNotFound)?;

        if !session.is_active() {
            return Err(SessionsServiceError::SessionEnded);
        }
        let role = if session.host_id == requester {
            ParticipantRole::Host
        } else if session.guest_id == Some(requester) {
            ParticipantRole::Guest
        } else {
            return Err(SessionsServiceError::NotParticipant);
        };

        self.sessions.set_preferences(session_id, role, &prefs).await
    }
}

/// Merge the two participants' bundles into one shared target.
///
/// Per category: intersection when both picked something and it overlaps,
/// union otherwise (an empty intersection must widen, never zero out, the
/// category). Returns `None` unless both bundles were submitted; one-sided
/// preferences never skew a shared deck.
pub fn merge_preferences(session: &Session) -> Option<PreferenceBundle> {
    let host = session.host_prefs.as_ref()?;
    let guest = session.guest_prefs.as_ref()?;
    Some(PreferenceBundle {
        mood: merge_category(&host.mood, &guest.mood),
        pace: merge_category(&host.pace, &guest.pace),
        vibe: merge_category(&host.vibe, &guest.vibe),
        era: merge_category(&host.era, &guest.era),
    })
}

fn merge_category(a: &[String], b: &[String]) -> Vec<String> {
    let intersection: Vec<String> = a.iter().filter(|v| b.contains(v)).cloned().collect();
    if !intersection.is_empty() {
        return intersection;
    }
    let mut union = a.to_vec();
    for v in b {
        if !union.contains(v) {
            union.push(v.clone());
        }
    }
    union
}
