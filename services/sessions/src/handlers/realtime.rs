//! WebSocket endpoint streaming session events to connected participants.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use tokio::sync::broadcast;
use uuid::Uuid;

use cinematch_core::identity::Identity;

use crate::domain::repository::SessionRepository as _;
use crate::error::SessionsServiceError;
use crate::realtime::{BroadcastHub, Notifier as _, PresenceStatus, SessionEvent};
use crate::state::AppState;

// ── GET /sessions/{id}/ws ────────────────────────────────────────────────────

pub async fn session_ws(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<Response, SessionsServiceError> {
    let session = state
        .session_repo()
        .find_by_id(session_id)
        .await?
        .ok_or(SessionsServiceError::SessionNotFound)?;
    if !session.is_active() {
        return Err(SessionsServiceError::SessionEnded);
    }
    if !session.is_participant(identity.user_id) {
        return Err(SessionsServiceError::NotParticipant);
    }

    let hub = state.hub.clone();
    let user_id = identity.user_id;
    Ok(ws.on_upgrade(move |socket| stream_events(socket, hub, session_id, user_id)))
}

/// Server-to-client only: inbound frames are drained to detect disconnects
/// but otherwise ignored. Presence transitions bracket the connection.
async fn stream_events(
    mut socket: WebSocket,
    hub: Arc<BroadcastHub>,
    session_id: Uuid,
    user_id: Uuid,
) {
    let mut rx = hub.subscribe(session_id);
    hub.publish(
        session_id,
        SessionEvent::Presence {
            user_id,
            status: PresenceStatus::Online,
        },
    );

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                // Missed events are acceptable; the channel itself is gone
                // only when the session ended.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(_)) => continue,
                Some(Err(_)) | None => break,
            },
        }
    }

    hub.publish(
        session_id,
        SessionEvent::Presence {
            user_id,
            status: PresenceStatus::Offline,
        },
    );
}
