//! WebSocket connection lifecycle: registration, inbound dispatch, teardown.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ClientMessage, ServerMessage},
    services::{auth_service, counter_service, leaderboard_service, notification_service},
    state::{OUTBOUND_QUEUE_CAPACITY, SharedState},
};

/// Drive one accepted WebSocket until the client disconnects.
///
/// Outbound frames go through a per-connection queue so broadcasts never
/// block on a slow socket; a dedicated writer task drains the queue.
pub async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE_CAPACITY);
    let writer = tokio::spawn(write_outbound(sink, rx));

    let connection_id = state.hub().register(tx.clone());
    info!(connection = %connection_id, total = state.hub().connection_count(), "client connected");

    while let Some(received) = stream.next().await {
        let message = match received {
            Ok(message) => message,
            Err(err) => {
                debug!(connection = %connection_id, error = %err, "read error, closing");
                break;
            }
        };

        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(frame) => dispatch(&state, connection_id, frame).await,
                Err(err) => {
                    warn!(connection = %connection_id, error = %err, "unparseable frame dropped");
                }
            },
            Message::Ping(payload) => {
                let _ = tx.try_send(Message::Pong(payload));
            }
            Message::Close(_) => break,
            Message::Binary(_) | Message::Pong(_) => {}
        }
    }

    state.hub().unregister(connection_id);
    drop(tx);
    if let Err(err) = writer.await {
        debug!(connection = %connection_id, error = %err, "writer task ended abnormally");
    }
    info!(connection = %connection_id, total = state.hub().connection_count(), "client disconnected");
}

async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Message>,
) {
    while let Some(message) = rx.recv().await {
        if sink.send(message).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}

/// Handle one parsed inbound frame. Failures never close the connection;
/// they are logged and the frame is dropped.
///
/// Authentication runs once, up front: any variant that declares a token via
/// [`ClientMessage::token`] must present a valid one before its handler runs.
async fn dispatch(state: &SharedState, connection_id: Uuid, frame: ClientMessage) {
    let label = frame.label();
    let actor = match frame.token() {
        Some(token) => match auth_service::authenticate(state, token).await {
            Ok(actor) => Some(actor),
            Err(err) => {
                warn!(connection = %connection_id, label, error = %err, "frame rejected");
                return;
            }
        },
        None => None,
    };

    match frame {
        ClientMessage::Join { room } => {
            state.hub().join(&room, connection_id);
            debug!(connection = %connection_id, room = %room, "joined room");
            send_snapshot(state, connection_id).await;
        }
        ClientMessage::UpdateCounters { data, .. } => {
            let Some(actor) = actor else { return };
            if let Err(err) = counter_service::apply_delta_and_broadcast(state, &actor, data).await
            {
                warn!(connection = %connection_id, actor = %actor.id, error = %err, "counter frame failed");
            }
        }
        ClientMessage::PushNotification { data, .. } => {
            let Some(actor) = actor else { return };
            if let Err(err) = auth_service::require_admin(&actor) {
                warn!(connection = %connection_id, actor = %actor.id, error = %err, "notification frame rejected");
                return;
            }
            if let Err(err) = notification_service::push(state, data).await {
                warn!(connection = %connection_id, error = %err, "notification frame failed");
            }
        }
        ClientMessage::Unknown => {
            warn!(connection = %connection_id, label, "unknown frame type dropped");
        }
    }
}

/// Bring a fresh joiner up to date: current leaderboard, plus the active
/// notification if one is showing. Both sends are best effort.
async fn send_snapshot(state: &SharedState, connection_id: Uuid) {
    match leaderboard_service::compute(state).await {
        Ok(snapshot) => {
            state
                .hub()
                .send_to(connection_id, &ServerMessage::LeaderboardUpdate(snapshot));
        }
        Err(err) => warn!(connection = %connection_id, error = %err, "join snapshot unavailable"),
    }

    match notification_service::active(state).await {
        Ok(Some(notification)) => {
            state.hub().send_to(
                connection_id,
                &ServerMessage::NotificationActive(notification),
            );
        }
        Ok(None) => {}
        Err(err) => warn!(connection = %connection_id, error = %err, "active notification unavailable"),
    }
}
