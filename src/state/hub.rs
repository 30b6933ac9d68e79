//! Fan-out hub for connected WebSocket clients.

use std::collections::HashSet;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::ws::ServerMessage;

/// Capacity of each connection's outbound queue. A client that falls this
/// far behind is evicted rather than awaited.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

#[derive(Clone)]
/// Handle used to push frames to one connected client.
pub struct ClientConnection {
    pub id: Uuid,
    pub tx: mpsc::Sender<Message>,
}

/// Registry of live connections and the rooms they subscribed to.
///
/// Broadcasts serialize the frame once and `try_send` it to every recipient;
/// a full or closed queue evicts the connection instead of blocking the
/// sender.
#[derive(Default)]
pub struct ConnectionHub {
    connections: DashMap<Uuid, ClientConnection>,
    rooms: DashMap<String, HashSet<Uuid>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return its id.
    pub fn register(&self, tx: mpsc::Sender<Message>) -> Uuid {
        let id = Uuid::new_v4();
        self.connections.insert(id, ClientConnection { id, tx });
        id
    }

    /// Drop a connection and remove it from every room.
    pub fn unregister(&self, id: Uuid) {
        self.connections.remove(&id);
        for mut room in self.rooms.iter_mut() {
            room.value_mut().remove(&id);
        }
    }

    /// Subscribe a connection to a room. Joining twice is a no-op.
    pub fn join(&self, room: &str, id: Uuid) {
        self.rooms.entry(room.to_owned()).or_default().insert(id);
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Send a frame to every registered connection. Returns the number of
    /// queues the frame was placed on.
    pub fn broadcast_all(&self, message: &ServerMessage) -> usize {
        let Some(frame) = serialize(message) else {
            return 0;
        };

        let targets: Vec<ClientConnection> = self
            .connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.deliver(&targets, &frame)
    }

    /// Send a frame to a single connection, evicting it when its queue is
    /// unusable. Returns whether the frame was queued.
    pub fn send_to(&self, id: Uuid, message: &ServerMessage) -> bool {
        let Some(frame) = serialize(message) else {
            return false;
        };
        let Some(target) = self.connections.get(&id).map(|entry| entry.value().clone()) else {
            return false;
        };
        self.deliver(&[target], &frame) == 1
    }

    /// Send a frame to the members of `room` only.
    pub fn broadcast_room(&self, room: &str, message: &ServerMessage) -> usize {
        let Some(frame) = serialize(message) else {
            return 0;
        };

        let members: Vec<Uuid> = match self.rooms.get(room) {
            Some(entry) => entry.iter().copied().collect(),
            None => return 0,
        };
        let targets: Vec<ClientConnection> = members
            .into_iter()
            .filter_map(|id| self.connections.get(&id).map(|entry| entry.value().clone()))
            .collect();
        self.deliver(&targets, &frame)
    }

    fn deliver(&self, targets: &[ClientConnection], frame: &str) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();

        for connection in targets {
            match connection.tx.try_send(Message::Text(frame.to_owned().into())) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(connection = %connection.id, "outbound queue full, evicting connection");
                    stale.push(connection.id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(connection = %connection.id, "outbound queue closed, evicting connection");
                    stale.push(connection.id);
                }
            }
        }

        for id in stale {
            self.unregister(id);
        }
        delivered
    }
}

fn serialize(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(frame) => Some(frame),
        Err(err) => {
            warn!(error = %err, "failed to serialize broadcast frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::Receiver;

    fn connect(hub: &ConnectionHub) -> (Uuid, Receiver<Message>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        (hub.register(tx), rx)
    }

    fn clear_frame() -> ServerMessage {
        ServerMessage::NotificationClear {}
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let hub = ConnectionHub::new();
        let (_a, mut rx_a) = connect(&hub);
        let (_b, mut rx_b) = connect(&hub);

        assert_eq!(hub.broadcast_all(&clear_frame()), 2);
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn closed_connection_is_evicted_and_others_still_receive() {
        let hub = ConnectionHub::new();
        let (_gone, rx_gone) = connect(&hub);
        let (_live, mut rx_live) = connect(&hub);
        drop(rx_gone);

        assert_eq!(hub.broadcast_all(&clear_frame()), 1);
        assert!(rx_live.recv().await.is_some());
        assert_eq!(hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn full_queue_evicts_the_slow_connection() {
        let hub = ConnectionHub::new();
        let (tx, _rx) = mpsc::channel(1);
        let id = hub.register(tx);
        hub.broadcast_all(&clear_frame());
        // Queue of one is now full; the next broadcast must evict.
        hub.broadcast_all(&clear_frame());
        assert_eq!(hub.connection_count(), 0);
        assert!(!hub.connections.contains_key(&id));
    }

    #[tokio::test]
    async fn joining_a_room_twice_delivers_one_copy() {
        let hub = ConnectionHub::new();
        let (id, mut rx) = connect(&hub);
        hub.join("leaderboard", id);
        hub.join("leaderboard", id);

        assert_eq!(hub.broadcast_room("leaderboard", &clear_frame()), 1);
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn room_broadcast_skips_non_members() {
        let hub = ConnectionHub::new();
        let (member, mut rx_member) = connect(&hub);
        let (_other, mut rx_other) = connect(&hub);
        hub.join("leaderboard", member);

        assert_eq!(hub.broadcast_room("leaderboard", &clear_frame()), 1);
        assert!(rx_member.recv().await.is_some());
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_to_targets_one_connection() {
        let hub = ConnectionHub::new();
        let (id, mut rx) = connect(&hub);
        let (_other, mut rx_other) = connect(&hub);

        assert!(hub.send_to(id, &clear_frame()));
        assert!(rx.recv().await.is_some());
        assert!(rx_other.try_recv().is_err());
        assert!(!hub.send_to(Uuid::new_v4(), &clear_frame()));
    }

    #[tokio::test]
    async fn unregister_leaves_all_rooms() {
        let hub = ConnectionHub::new();
        let (id, _rx) = connect(&hub);
        hub.join("a", id);
        hub.join("b", id);

        hub.unregister(id);
        assert_eq!(hub.broadcast_room("a", &clear_frame()), 0);
        assert_eq!(hub.broadcast_room("b", &clear_frame()), 0);
    }
}
