use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use cinematch_core::identity::Identity;

use crate::error::SessionsServiceError;
use crate::state::AppState;
use crate::usecase::session::ListGenresUseCase;

const INDUSTRIES: [&str; 2] = ["bollywood", "hollywood"];

// ── GET /genres ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct GenreListQuery {
    pub industry: Option<String>,
}

#[derive(Serialize)]
pub struct GenreResponse {
    pub id: i32,
    pub tmdb_id: i32,
    pub name: String,
    pub industry: String,
}

pub async fn get_genres(
    _identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<GenreListQuery>,
) -> Result<Json<Vec<GenreResponse>>, SessionsServiceError> {
    let industry = query
        .industry
        .as_deref()
        .filter(|i| INDUSTRIES.contains(i))
        .ok_or(SessionsServiceError::MissingData)?;

    let usecase = ListGenresUseCase {
        catalog: state.catalog_repo(),
    };
    let genres = usecase.execute(industry).await?;
    Ok(Json(
        genres
            .into_iter()
            .map(|g| GenreResponse {
                id: g.id,
                tmdb_id: g.tmdb_id,
                name: g.name,
                industry: g.industry,
            })
            .collect(),
    ))
}
