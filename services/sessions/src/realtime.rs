//! Session-scoped event fan-out.
//!
//! Each session gets its own tokio broadcast channel; connected participants
//! subscribe through the WebSocket handler. Publishing is fire-and-forget: a
//! slow or absent listener never blocks the swipe/match path, and a lagged
//! receiver simply misses events (at-most-once delivery).

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered events per session channel before slow receivers start lagging.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// An event scoped to one session.
///
/// `SwipeHappened` deliberately carries only the acting user, never the
/// reaction; the partner must not learn the choice before a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    SwipeHappened {
        user_id: Uuid,
    },
    Match {
        session_id: Uuid,
        movie_id: i32,
        title: String,
    },
    SessionEnded {
        session_id: Uuid,
    },
    Presence {
        user_id: Uuid,
        status: PresenceStatus,
    },
}

/// Fan-out port for session events.
pub trait Notifier: Send + Sync {
    /// Fire-and-forget publish to everyone listening on the session.
    /// Must never block and never fail the caller.
    fn publish(&self, session_id: Uuid, event: SessionEvent);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn publish(&self, session_id: Uuid, event: SessionEvent) {
        (**self).publish(session_id, event);
    }
}

/// In-process hub of per-session broadcast channels.
#[derive(Default)]
pub struct BroadcastHub {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<SessionEvent>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a session's event stream, creating the channel on first
    /// use.
    pub fn subscribe(&self, session_id: Uuid) -> broadcast::Receiver<SessionEvent> {
        let mut channels = self.channels.write().expect("hub lock poisoned");
        channels
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Drop a session's channel once the session is over. Existing receivers
    /// keep draining what was already buffered.
    pub fn remove(&self, session_id: Uuid) {
        let mut channels = self.channels.write().expect("hub lock poisoned");
        channels.remove(&session_id);
    }
}

impl Notifier for BroadcastHub {
    fn publish(&self, session_id: Uuid, event: SessionEvent) {
        let channels = self.channels.read().expect("hub lock poisoned");
        if let Some(tx) = channels.get(&session_id) {
            // Err means no live receivers, nothing to deliver to.
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let hub = BroadcastHub::new();
        let session_id = Uuid::new_v4();
        let mut rx = hub.subscribe(session_id);

        let user_id = Uuid::new_v4();
        hub.publish(session_id, SessionEvent::SwipeHappened { user_id });

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::SwipeHappened { user_id }
        );
    }

    #[tokio::test]
    async fn should_deliver_to_all_subscribers() {
        let hub = BroadcastHub::new();
        let session_id = Uuid::new_v4();
        let mut rx1 = hub.subscribe(session_id);
        let mut rx2 = hub.subscribe(session_id);

        hub.publish(session_id, SessionEvent::SessionEnded { session_id });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            SessionEvent::SessionEnded { .. }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            SessionEvent::SessionEnded { .. }
        ));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let hub = BroadcastHub::new();
        hub.publish(
            Uuid::new_v4(),
            SessionEvent::SessionEnded {
                session_id: Uuid::new_v4(),
            },
        );
    }

    #[tokio::test]
    async fn should_not_leak_events_across_sessions() {
        let hub = BroadcastHub::new();
        let session_a = Uuid::new_v4();
        let session_b = Uuid::new_v4();
        let mut rx_b = hub.subscribe(session_b);

        let _rx_a = hub.subscribe(session_a);
        hub.publish(
            session_a,
            SessionEvent::SwipeHappened {
                user_id: Uuid::new_v4(),
            },
        );

        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn should_serialize_events_with_kebab_case_type_tag() {
        let event = SessionEvent::SwipeHappened {
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "swipe-happened");

        let event = SessionEvent::Presence {
            user_id: Uuid::nil(),
            status: PresenceStatus::Online,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "presence");
        assert_eq!(json["status"], "online");
    }
}
