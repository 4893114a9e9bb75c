use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use cinematch_core::identity::Identity;

use crate::domain::types::Movie;
use crate::error::SessionsServiceError;
use crate::state::AppState;
use crate::usecase::deck::BuildDeckUseCase;

#[derive(Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub overview: String,
    pub release_date: Option<chrono::NaiveDate>,
    pub rating: Option<f64>,
    pub language: String,
    pub tags: Vec<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            overview: movie.overview,
            release_date: movie.release_date,
            rating: movie.rating,
            language: movie.language,
            tags: movie.tags,
        }
    }
}

#[derive(Serialize)]
pub struct DeckResponse {
    pub session_id: Uuid,
    pub genre: String,
    pub movies: Vec<MovieResponse>,
}

// ── GET /sessions/{id}/deck ──────────────────────────────────────────────────

pub async fn get_deck(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DeckResponse>, SessionsServiceError> {
    let usecase = BuildDeckUseCase {
        sessions: state.session_repo(),
        catalog: state.catalog_repo(),
        swipes: state.swipe_repo(),
        matches: state.match_repo(),
        exposures: state.exposure_repo(),
        taste: state.taste_repo(),
        chemistry: state.chemistry_repo(),
        stats: state.stats_repo(),
    };
    let deck = usecase.execute(session_id, identity.user_id).await?;
    Ok(Json(DeckResponse {
        session_id: deck.session_id,
        genre: deck.genre,
        movies: deck.movies.into_iter().map(Into::into).collect(),
    }))
}
