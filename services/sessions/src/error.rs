use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Sessions service domain error variants.
///
/// The taxonomy: validation and not-found are the caller's fault, conflicts
/// are legal states the caller raced into, forbidden is a membership or role
/// failure, and `Internal` wraps infrastructure errors from the primary
/// write path (secondary writes are swallowed before reaching here).
#[derive(Debug, thiserror::Error)]
pub enum SessionsServiceError {
    #[error("missing data")]
    MissingData,
    #[error("genre not found")]
    GenreNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("movie not found")]
    MovieNotFound,
    #[error("swipe not found")]
    SwipeNotFound,
    #[error("host cannot join own session")]
    HostCannotJoin,
    #[error("session already full")]
    GuestSlotFull,
    #[error("session has ended")]
    SessionEnded,
    #[error("session already ended")]
    SessionAlreadyEnded,
    #[error("session is not ready yet")]
    SessionNotReady,
    #[error("not part of this session")]
    NotParticipant,
    #[error("only the host may do this")]
    HostOnly,
    #[error("genre is locked once swiping has started")]
    GenreLocked,
    #[error("already swiped on this movie")]
    DuplicateSwipe,
    #[error("this movie is already matched")]
    AlreadyMatched,
    #[error("cannot undo after match")]
    UndoAfterMatch,
    #[error("undo window expired")]
    UndoWindowExpired,
    #[error("could not allocate a unique session code")]
    CodeCollision,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SessionsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingData => "MISSING_DATA",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::MovieNotFound => "MOVIE_NOT_FOUND",
            Self::SwipeNotFound => "SWIPE_NOT_FOUND",
            Self::HostCannotJoin => "HOST_CANNOT_JOIN",
            Self::GuestSlotFull => "GUEST_SLOT_FULL",
            Self::SessionEnded => "SESSION_ENDED",
            Self::SessionAlreadyEnded => "SESSION_ALREADY_ENDED",
            Self::SessionNotReady => "SESSION_NOT_READY",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::HostOnly => "HOST_ONLY",
            Self::GenreLocked => "GENRE_LOCKED",
            Self::DuplicateSwipe => "DUPLICATE_SWIPE",
            Self::AlreadyMatched => "ALREADY_MATCHED",
            Self::UndoAfterMatch => "UNDO_AFTER_MATCH",
            Self::UndoWindowExpired => "UNDO_WINDOW_EXPIRED",
            Self::CodeCollision => "CODE_COLLISION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for SessionsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingData | Self::HostCannotJoin | Self::SessionNotReady => {
                StatusCode::BAD_REQUEST
            }
            Self::GenreNotFound
            | Self::SessionNotFound
            | Self::MovieNotFound
            | Self::SwipeNotFound => StatusCode::NOT_FOUND,
            Self::SessionEnded
            | Self::NotParticipant
            | Self::HostOnly
            | Self::UndoWindowExpired => StatusCode::FORBIDDEN,
            Self::GuestSlotFull
            | Self::SessionAlreadyEnded
            | Self::GenreLocked
            | Self::DuplicateSwipe
            | Self::AlreadyMatched
            | Self::UndoAfterMatch
            | Self::CodeCollision => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
