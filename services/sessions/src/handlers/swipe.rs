use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinematch_core::identity::Identity;
use cinematch_domain::reaction::Reaction;

use crate::error::SessionsServiceError;
use crate::state::AppState;
use crate::usecase::swipe::{RecordSwipeUseCase, UndoSwipeUseCase};

// ── POST /sessions/{id}/swipes ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RecordSwipeRequest {
    pub movie_id: i32,
    pub reaction: Reaction,
}

#[derive(Serialize)]
pub struct RecordSwipeResponse {
    pub matched: bool,
}

pub async fn record_swipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<RecordSwipeRequest>,
) -> Result<(StatusCode, Json<RecordSwipeResponse>), SessionsServiceError> {
    let usecase = RecordSwipeUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
        swipes: state.swipe_repo(),
        matches: state.match_repo(),
        taste: state.taste_repo(),
        chemistry: state.chemistry_repo(),
        stats: state.stats_repo(),
        notifier: state.hub.clone(),
    };
    let out = usecase
        .execute(session_id, identity.user_id, body.movie_id, body.reaction)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordSwipeResponse {
            matched: out.matched,
        }),
    ))
}

// ── DELETE /sessions/{id}/swipes/{movie_id} ──────────────────────────────────

pub async fn undo_swipe(
    identity: Identity,
    State(state): State<AppState>,
    Path((session_id, movie_id)): Path<(Uuid, i32)>,
) -> Result<StatusCode, SessionsServiceError> {
    let usecase = UndoSwipeUseCase {
        sessions: state.session_repo(),
        swipes: state.swipe_repo(),
        matches: state.match_repo(),
    };
    usecase
        .execute(session_id, identity.user_id, movie_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
