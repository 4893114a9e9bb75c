use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinematch_core::identity::Identity;

use crate::domain::types::{EndReason, Genre, PreferenceBundle, Session, SessionStats};
use crate::error::SessionsServiceError;
use crate::state::AppState;
use crate::usecase::preference::SetPreferencesUseCase;
use crate::usecase::session::{
    CreateSessionInput, CreateSessionUseCase, EndSessionUseCase, GetSessionUseCase,
    JoinSessionUseCase, SessionStatusUseCase, SetGenreUseCase,
};
use crate::usecase::stats::GetSessionStatsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub code: String,
    pub host_id: Uuid,
    pub guest_id: Option<Uuid>,
    pub genre_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub industry: Option<String>,
    #[serde(serialize_with = "cinematch_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SessionResponse {
    fn from_session(session: Session, genre: Option<Genre>) -> Self {
        Self {
            id: session.id,
            code: session.code,
            host_id: session.host_id,
            guest_id: session.guest_id,
            genre_id: session.genre_id,
            genre: genre.map(|g| g.name),
            industry: session.industry,
            created_at: session.created_at,
            ended_at: session.ended_at,
        }
    }
}

// ── POST /sessions ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub genre_id: i32,
    pub industry: Option<String>,
}

pub async fn create_session(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), SessionsServiceError> {
    let usecase = CreateSessionUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
    };
    let (session, genre) = usecase
        .execute(
            identity.user_id,
            CreateSessionInput {
                genre_id: body.genre_id,
                industry: body.industry,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from_session(session, Some(genre))),
    ))
}

// ── POST /sessions/join ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct JoinSessionRequest {
    pub code: String,
}

pub async fn join_session(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<JoinSessionRequest>,
) -> Result<Json<SessionResponse>, SessionsServiceError> {
    let usecase = JoinSessionUseCase {
        sessions: state.session_repo(),
    };
    let session = usecase
        .execute(&body.code.to_uppercase(), identity.user_id)
        .await?;
    Ok(Json(SessionResponse::from_session(session, None)))
}

// ── GET /sessions/{id} ───────────────────────────────────────────────────────

pub async fn get_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, SessionsServiceError> {
    let usecase = GetSessionUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
    };
    let (session, genre) = usecase.execute(session_id, identity.user_id).await?;
    Ok(Json(SessionResponse::from_session(session, Some(genre))))
}

// ── GET /sessions/code/{code} ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionStatusResponse {
    pub id: Uuid,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub guest_joined: bool,
    pub active: bool,
}

/// Minimal pre-join view: enough for a prospective guest to confirm the code,
/// nothing that identifies the participants.
pub async fn session_status(
    _identity: Identity,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SessionStatusResponse>, SessionsServiceError> {
    let usecase = SessionStatusUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
    };
    let (session, genre) = usecase.execute(&code.to_uppercase()).await?;
    Ok(Json(SessionStatusResponse {
        id: session.id,
        active: session.is_active(),
        code: session.code,
        genre: genre.map(|g| g.name),
        guest_joined: session.guest_id.is_some(),
    }))
}

// ── PATCH /sessions/{id}/genre ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetGenreRequest {
    pub genre_id: i32,
}

pub async fn set_genre(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SetGenreRequest>,
) -> Result<StatusCode, SessionsServiceError> {
    let usecase = SetGenreUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
        swipes: state.swipe_repo(),
    };
    usecase
        .execute(session_id, body.genre_id, identity.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /sessions/{id}/preferences ───────────────────────────────────────────

pub async fn set_preferences(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<PreferenceBundle>,
) -> Result<StatusCode, SessionsServiceError> {
    let usecase = SetPreferencesUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(session_id, identity.user_id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /sessions/{id}/end ──────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct EndSessionRequest {
    pub reason: Option<EndReason>,
}

pub async fn end_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Option<Json<EndSessionRequest>>,
) -> Result<StatusCode, SessionsServiceError> {
    let reason = body
        .and_then(|Json(b)| b.reason)
        .unwrap_or(EndReason::User);
    let usecase = EndSessionUseCase {
        sessions: state.session_repo(),
        stats: state.stats_repo(),
        notifier: state.hub.clone(),
    };
    usecase.execute(session_id, identity.user_id, reason).await?;
    // The ended event above is the channel's last payload.
    state.hub.remove(session_id);
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /sessions/{id}/stats ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub session_id: Uuid,
    pub total_swipes: i64,
    pub total_matches: i64,
    pub duration_ms: Option<i64>,
    pub ended_by: Option<EndReason>,
    pub quality_score: Option<i32>,
    pub highlights: Vec<String>,
}

impl From<SessionStats> for StatsResponse {
    fn from(stats: SessionStats) -> Self {
        Self {
            session_id: stats.session_id,
            total_swipes: stats.total_swipes,
            total_matches: stats.total_matches,
            duration_ms: stats.duration_ms,
            ended_by: stats.ended_by,
            quality_score: stats.quality_score,
            highlights: stats.highlights,
        }
    }
}

pub async fn get_session_stats(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StatsResponse>, SessionsServiceError> {
    let usecase = GetSessionStatsUseCase {
        sessions: state.session_repo(),
        stats: state.stats_repo(),
    };
    let stats = usecase.execute(session_id, identity.user_id).await?;
    Ok(Json(stats.into()))
}
