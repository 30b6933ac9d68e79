//! DTO definitions used by the admin REST API and the notification push path.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{NotificationEntity, NotificationKind, SystemSettingsEntity, TeamEntity},
    dto::format_system_time,
};

/// Payload describing a takeover notification to push, shared by the socket
/// frame and the REST endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPush {
    /// Media type of the takeover.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[validate(length(max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    pub media_url: Option<String>,
    /// Display duration; defaults to the configured duration when absent.
    #[validate(range(min = 1000, max = 600_000))]
    pub duration_ms: Option<u64>,
}

/// Notification as broadcast to clients, with the global sound attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNotification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub duration_ms: u64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_sound_url: Option<String>,
}

impl ActiveNotification {
    /// Attach the configured notification sound to a stored notification.
    pub fn from_entity(entity: NotificationEntity, sound_url: Option<String>) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            title: entity.title,
            message: entity.message,
            media_url: entity.media_url,
            duration_ms: entity.duration_ms,
            created_at: format_system_time(entity.created_at),
            notification_sound_url: sound_url,
        }
    }
}

/// Global settings as seen by clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_sound_url: Option<String>,
    pub featured_team_ids: Vec<Uuid>,
}

impl From<SystemSettingsEntity> for SettingsView {
    fn from(entity: SystemSettingsEntity) -> Self {
        Self {
            notification_sound_url: entity.notification_sound_url,
            featured_team_ids: entity.featured_team_ids,
        }
    }
}

/// Partial settings update; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub notification_sound_url: Option<String>,
    pub featured_team_ids: Option<Vec<Uuid>>,
}

/// Team row in the admin overview listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    pub id: Uuid,
    pub name: String,
    pub tl_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_name: Option<String>,
    pub agent_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration_audio_url: Option<String>,
}

impl TeamOverview {
    pub fn new(team: TeamEntity, tl_name: Option<String>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            tl_id: team.tl_id,
            tl_name,
            agent_count: team.agents.len(),
            celebration_audio_url: team.celebration_audio_url,
        }
    }
}

/// Generic action acknowledgement used by admin endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
