use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::AgentDelta,
    dto::{
        admin::{ActiveNotification, NotificationPush, SettingsView},
        leaderboard::{CelebrationEvent, LeaderboardSnapshot},
    },
};

/// Counter mutation payload carried by `tl:updateCounters`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounterMutation {
    pub agent_id: Uuid,
    pub delta: AgentDelta,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from WebSocket clients.
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Subscribe the connection to a named room (no auth required).
    #[serde(rename = "join")]
    Join { room: String },
    /// Apply a counter delta to an agent. TL or admin token required.
    #[serde(rename = "tl:updateCounters")]
    UpdateCounters { token: String, data: CounterMutation },
    /// Push a takeover notification. Admin token required.
    #[serde(rename = "admin:pushNotification")]
    PushNotification {
        token: String,
        data: NotificationPush,
    },
    /// Anything this version does not understand; dropped after a warn log.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// The per-message token, for variants that mutate state.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UpdateCounters { token, .. } | Self::PushNotification { token, .. } => {
                Some(token.as_str())
            }
            Self::Join { .. } | Self::Unknown => None,
        }
    }

    /// Wire label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::UpdateCounters { .. } => "tl:updateCounters",
            Self::PushNotification { .. } => "admin:pushNotification",
            Self::Unknown => "unknown",
        }
    }
}

/// Messages fanned out to connected clients as `{type, data}` frames.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "leaderboard:update")]
    LeaderboardUpdate(LeaderboardSnapshot),
    #[serde(rename = "sale:activation")]
    SaleActivation(CelebrationEvent),
    #[serde(rename = "notification:active")]
    NotificationActive(ActiveNotification),
    #[serde(rename = "notification:clear")]
    NotificationClear {},
    #[serde(rename = "settings:update")]
    SettingsUpdate(SettingsView),
    #[serde(rename = "booking:update")]
    BookingUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_frame_parses() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"join","room":"leaderboard"}"#).unwrap();
        // Joining requires no token.
        assert!(parsed.token().is_none());
        assert!(matches!(parsed, ClientMessage::Join { room } if room == "leaderboard"));
    }

    #[test]
    fn update_counters_frame_parses_with_partial_delta() {
        let raw = r#"{
            "type": "tl:updateCounters",
            "token": "abc",
            "data": {"agentId": "7f8a3d52-9f9f-4f27-8c4e-2a4f0a1b9c01", "delta": {"submissions": 2}}
        }"#;
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.token(), Some("abc"));
        let ClientMessage::UpdateCounters { token, data } = parsed else {
            panic!("wrong variant");
        };
        assert_eq!(token, "abc");
        assert_eq!(data.delta.submissions, Some(2));
        assert_eq!(data.delta.activations, None);
    }

    #[test]
    fn unrecognized_type_maps_to_unknown() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"totally:new","whatever":1}"#).unwrap();
        assert!(matches!(parsed, ClientMessage::Unknown));
        assert!(parsed.token().is_none());
    }

    #[test]
    fn server_frames_are_type_data_tagged() {
        let frame = ServerMessage::BookingUpdate {
            date: Some("2026-03-02".to_owned()),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "booking:update");
        assert_eq!(json["data"]["date"], "2026-03-02");

        let clear = serde_json::to_value(ServerMessage::NotificationClear {}).unwrap();
        assert_eq!(clear["type"], "notification:clear");
        assert!(clear["data"].as_object().unwrap().is_empty());
    }
}
