use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use cinematch_core::health::healthz;
use cinematch_core::middleware::request_id_layer;

use crate::handlers::{
    catalog::get_genres,
    deck::get_deck,
    history::{get_matches, get_swipe_history},
    realtime::session_ws,
    session::{
        create_session, end_session, get_session, get_session_stats, join_session,
        session_status, set_genre, set_preferences,
    },
    swipe::{record_swipe, undo_swipe},
};
use crate::state::AppState;

/// Ready only when the database answers.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/genres", get(get_genres))
        // Sessions
        .route("/sessions", post(create_session))
        .route("/sessions/join", post(join_session))
        .route("/sessions/code/{code}", get(session_status))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/genre", patch(set_genre))
        .route("/sessions/{id}/preferences", put(set_preferences))
        .route("/sessions/{id}/end", post(end_session))
        .route("/sessions/{id}/stats", get(get_session_stats))
        // Swiping
        .route("/sessions/{id}/swipes", post(record_swipe))
        .route("/sessions/{id}/swipes/{movie_id}", delete(undo_swipe))
        // Deck
        .route("/sessions/{id}/deck", get(get_deck))
        // Realtime
        .route("/sessions/{id}/ws", get(session_ws))
        // Cross-session views
        .route("/swipes", get(get_swipe_history))
        .route("/matches", get(get_matches))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
