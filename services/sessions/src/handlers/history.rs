use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinematch_core::identity::Identity;
use cinematch_domain::pagination::{DEFAULT_PER_PAGE, PageRequest};
use cinematch_domain::reaction::Reaction;

use crate::error::SessionsServiceError;
use crate::state::AppState;
use crate::usecase::history::{ListMatchesUseCase, SwipeHistoryUseCase};

// ── GET /swipes ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SwipeHistoryQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub session_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct SwipeHistoryItem {
    pub session_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    pub reaction: Reaction,
    #[serde(serialize_with = "cinematch_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_swipe_history(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SwipeHistoryQuery>,
) -> Result<Json<Vec<SwipeHistoryItem>>, SessionsServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(DEFAULT_PER_PAGE),
        page: query.page.unwrap_or(1),
    };
    let usecase = SwipeHistoryUseCase {
        swipes: state.swipe_repo(),
        catalog: state.catalog_repo(),
    };
    let entries = usecase
        .execute(identity.user_id, query.session_id, page)
        .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| SwipeHistoryItem {
                session_id: e.session_id,
                movie_id: e.movie_id,
                title: e.title,
                reaction: e.reaction,
                created_at: e.created_at,
            })
            .collect(),
    ))
}

// ── GET /matches ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MatchItem {
    pub session_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    #[serde(serialize_with = "cinematch_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_matches(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchItem>>, SessionsServiceError> {
    let usecase = ListMatchesUseCase {
        sessions: state.session_repo(),
        matches: state.match_repo(),
        catalog: state.catalog_repo(),
    };
    let entries = usecase.execute(identity.user_id).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| MatchItem {
                session_id: e.session_id,
                movie_id: e.movie_id,
                title: e.title,
                created_at: e.created_at,
            })
            .collect(),
    ))
}
